/// Sets up `env_logger` for the binary: debug output with `--verbose`,
/// warnings only otherwise.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();
}
