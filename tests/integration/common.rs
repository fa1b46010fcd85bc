//! Shared fixtures: forum pages and client construction

use forum_sentry::config::{
    Config, EmptySectionPolicy, ForumConfig, ProfileConfig, UserAgentConfig,
};
use forum_sentry::ForumClient;

/// Creates a test configuration pointing at `base_url`
pub fn create_test_config(base_url: &str, fetch_reputation: bool) -> Config {
    Config {
        forum: ForumConfig {
            base_url: format!("{}/", base_url),
            fetch_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        profile: ProfileConfig {
            fetch_reputation,
            empty_visitor_section: EmptySectionPolicy::Empty,
        },
        watch: vec![],
    }
}

pub fn create_client(base_url: &str, fetch_reputation: bool) -> ForumClient {
    ForumClient::from_config(&create_test_config(base_url, fetch_reputation))
        .expect("Failed to build client")
}

/// A vBulletin-style profile page
pub fn profile_page(user_name: &str, total_posts: &str) -> String {
    format!(
        r#"<html><head><title>View Profile: {user_name}</title></head><body>
        <div id="username_box">
            <h1>{user_name}</h1>
        </div>
        <div id="collapseobj_stats"><div>
            <fieldset><legend>Total Posts</legend><ul>
                <li>Total Posts: {total_posts}</li>
                <li>Posts Per Day: 2.15</li>
            </ul></fieldset>
            <fieldset><legend>General Information</legend><ul>
                <li>Last Activity: Today 09:12 AM</li>
                <li>Join Date: 04-01-2006</li>
            </ul></fieldset>
        </div></div>
        <div id="collapseobj_aboutme"><div><ul><li><dl>
            <dd>San Andreas Multiplayer
lead developer</dd>
        </dl></li></ul></div></div>
        <ol id="message_list">
            <li><div><img src="avatar1.png"></div><div>
                <div><div><a href="member.php?u=10">Y_Less</a></div></div>
                <div>Nice release!</div>
            </div></li>
            <li><div><img src="avatar2.png"></div><div>
                <div><div><a href="member.php?u=11">Jay</a></div></div>
            </div></li>
            <li><div><img src="avatar3.png"></div><div>
                <div><div><a href="member.php?u=12">Mike</a></div></div>
                <div>Thanks</div>
            </div></li>
        </ol>
        </body></html>"#
    )
}

/// A "find all posts by user" result page listing one post
pub fn listing_page(href: &str, title: &str) -> String {
    format!(
        r#"<html><body><table class="tborder">
        <tr><td class="alt1"><div class="alt2"><div>
            <em><a href="{href}">{title}</a></em>
        </div></div></td></tr>
        </table></body></html>"#
    )
}

/// A thread page holding post `post_id` with the poster's reputation and message
pub fn thread_page(post_id: &str, reputation: &str, message: &str) -> String {
    format!(
        r#"<html><body>
        <table id="post{post_id}" class="tborder"><tbody>
            <tr><td class="thead">Today</td></tr>
            <tr valign="top">
                <td class="alt2"><div><div>Join Date: Apr 2006</div><div>Posts: 3,210</div><div>Reputation: {reputation}</div></div></td>
                <td class="alt1"><div id="post_message_{post_id}">{message}</div></td>
            </tr>
        </tbody></table>
        </body></html>"#
    )
}
