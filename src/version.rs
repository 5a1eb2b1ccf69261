pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn commit() -> &'static str {
    option_env!("PAPRIKA_BOT_COMMIT").unwrap_or("none")
}

pub fn build_date() -> &'static str {
    option_env!("PAPRIKA_BOT_BUILD_DATE").unwrap_or("unknown")
}

pub fn banner() -> String {
    format!(
        "\nBuilt : {} \nVersion: {} (with : {}-{}) \nDate: {}\n",
        commit(),
        VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH,
        build_date()
    )
}

pub fn print() {
    println!("{}", banner());
}
