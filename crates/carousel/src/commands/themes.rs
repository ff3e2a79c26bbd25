use colored::Colorize;

use crate::theme::Theme;

pub fn run() {
    for theme in Theme::catalog() {
        println!(
            "{:<14} {:<14} {}",
            theme.id.bold(),
            theme.name,
            theme.description.dimmed()
        );
        println!(
            "{:<14} accent {}  font {}  background {}",
            "",
            theme.primary_color.cyan(),
            theme.font_family,
            theme.bg_style
        );
    }
}
