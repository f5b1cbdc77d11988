use client::views::Navbar;
use entities::Bookmark;

pub const EMPTY_LIST: &str = "No bookmarks yet. Add your first bookmark to get started!";

pub fn bookmark_line(bookmark: &Bookmark) -> String {
    format!(
        "{}  {}  ({})  {}",
        bookmark.id,
        bookmark.title,
        bookmark.hostname().unwrap_or_else(|| bookmark.url.clone()),
        bookmark.created_at.format("%Y-%m-%d"),
    )
}

pub fn render_list(bookmarks: &[Bookmark]) -> String {
    if bookmarks.is_empty() {
        return format!("{EMPTY_LIST}\n");
    }

    let mut out = String::new();
    for bookmark in bookmarks {
        out.push_str(&bookmark_line(bookmark));
        out.push('\n');
    }
    out
}

pub fn identity(navbar: &Navbar) -> String {
    match (navbar.display_name(), navbar.email()) {
        (Some(name), Some(email)) => format!("{name} <{email}>\n"),
        _ => String::from("Not signed in\n"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use entities::User;

    use super::*;

    fn bookmark(id: &str, url: &str) -> Bookmark {
        Bookmark {
            id: id.to_string(),
            title: String::from("Rust"),
            url: url.to_string(),
            user_id: String::from("u1"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn lists_newest_first_as_given() {
        let rendered = render_list(&[
            bookmark("b2", "https://www.rust-lang.org/learn"),
            bookmark("b1", "https://docs.rs"),
        ]);
        assert_eq!(
            rendered,
            "b2  Rust  (www.rust-lang.org)  2024-05-01\nb1  Rust  (docs.rs)  2024-05-01\n"
        );
    }

    #[test]
    fn empty_list_has_a_hint() {
        assert_eq!(render_list(&[]), format!("{EMPTY_LIST}\n"));
    }

    #[test]
    fn identity_line() {
        let navbar = Navbar::new(Some(User {
            id: String::from("u1"),
            name: String::from("kage"),
            email: String::from("kage@example.com"),
            full_name: Some(String::from("Kage Tanaka")),
        }));
        assert_eq!(identity(&navbar), "Kage Tanaka <kage@example.com>\n");
        assert_eq!(identity(&Navbar::new(None)), "Not signed in\n");
    }
}
