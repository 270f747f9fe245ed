//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner with version information.
pub fn print_banner() {
    println!(
        "{} {}",
        style("Ecwid Images Downloader").cyan().bold(),
        style(env!("CARGO_PKG_VERSION")).dim()
    );
}

/// Mask a token for display, keeping its prefix and last characters.
pub fn mask_token(token: &str) -> String {
    let visible_tail = 4;
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= visible_tail * 2 {
        return "*".repeat(chars.len());
    }

    let prefix: String = match token.find('_') {
        Some(pos) if pos < chars.len() / 2 => token[..=pos].to_string(),
        _ => String::new(),
    };
    let tail: String = chars[chars.len() - visible_tail..].iter().collect();
    format!("{}***{}", prefix, tail)
}

/// Print what this run is about to do.
pub fn print_config_summary(
    subject: &str,
    store_id: u64,
    token: &str,
    download_dir: &str,
    parallelism: usize,
    use_combinations: bool,
) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Store:        {}", store_id);
    println!("  Token:        {}", mask_token(token));
    println!("  Images of:    {}", subject);
    println!("  Combinations: {}", if use_combinations { "yes" } else { "no" });
    println!("  Directory:    {}", download_dir);
    println!("  Parallelism:  {}", parallelism);
    println!();
}
