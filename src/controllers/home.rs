//! Home page.

pub const TITLE: &str = "Medical Records Database";

/// Body text, ending with the connection the dashboard is using.
pub fn lines(connection: Option<&str>) -> Vec<String> {
    let mut lines = vec![
        "Welcome to the Medical Records Database app!".to_string(),
        "Use the sidebar to navigate through the application.".to_string(),
        String::new(),
    ];
    lines.push(match connection {
        Some(info) => format!("Connected to {info}"),
        None => "Not connected".to_string(),
    });
    lines
}
