use boolean_enums::gen_boolean_enum;

gen_boolean_enum!(pub IsVerbose);

pub fn init_tool_logging(is_verbose: IsVerbose) {
    let is_verbose: bool = is_verbose.into();
    env_logger::builder()
        .filter_level(
            if is_verbose || cfg!(debug_assertions) {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            }
        )
        .parse_default_env()
        .init()
}
