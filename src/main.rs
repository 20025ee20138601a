fn main() {
    if let Err(err) = wallpaint::app::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
