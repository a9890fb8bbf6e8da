// Terminal output for CLI commands. Everything diagnostic goes to stderr;
// stdout carries only step output and machine-readable plan output, so the
// run can be piped.

fn paint(code: &str, text: &str) -> String {
    format!("\x1b[{}m{}\x1b[0m", code, text)
}

pub fn status(action: &str, message: &str) {
    eprintln!("{} {}", paint("1;36", &format!("{:>12}", action)), message);
}

pub fn success(message: &str) {
    eprintln!("{} {}", paint("1;32", "  \u{2713}"), message);
}

pub fn failure(message: &str) {
    eprintln!("{} {}", paint("1;31", "  \u{2717}"), message);
}

/// Individual passing check during validation
pub fn check(message: &str) {
    eprintln!("{} {}", paint("32", "  \u{2713}"), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", paint("33", "  !"), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", paint("1;31", "error:"), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", paint("36", "  i"), message);
}

pub fn dim(message: &str) {
    eprintln!("{}", paint("2", message));
}

pub fn dim_success(message: &str) {
    eprintln!("{}", paint("32", message));
}

pub fn dim_failure(message: &str) {
    eprintln!("{}", paint("31", message));
}

pub fn stage_header(name: &str, total_steps: usize) {
    eprintln!(
        "{} '{}' ({} steps)",
        paint("1;34", "  Stage"),
        name,
        total_steps
    );
}

pub fn post_header(phase: &str, total_steps: usize) {
    eprintln!(
        "{} ({}) ({} steps)",
        paint("1;34", "  Post"),
        phase,
        total_steps
    );
}

pub fn step_output(line: &str) {
    println!("      | {}", line);
}

pub fn step_error(line: &str) {
    eprintln!("{}", paint("31", &format!("      | {}", line)));
}

pub fn header(message: &str) {
    eprintln!("{}", paint("1", &format!("==> {}", message)));
}
