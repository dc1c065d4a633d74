fn main() {
    if let Err(e) = templet::cli::run() {
        templet::ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
