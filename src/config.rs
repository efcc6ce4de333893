use std::env;

/// Returns the value of the named environment variable if it exists or panics.
pub fn get_variable(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("must define {} environment variable", name))
}

/// Returns the value of the named environment variable, treating an
/// empty value as unset.
pub fn get_optional_variable(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// Parses the named environment variable as a port number or panics.
pub fn get_port(name: &str) -> u16 {
    get_variable(name)
        .parse()
        .unwrap_or_else(|_| panic!("parse {} as u16", name))
}
