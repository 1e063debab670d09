// Positional command-line arguments: `[port] [directory]`

use crate::error::StartupError;

/// Values given on the command line, before defaults are applied
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub directory: Option<String>,
}

/// Parse positional arguments (program name already stripped).
///
/// A lone non-numeric argument is taken as the directory. Anything after the
/// second argument is ignored.
pub fn parse_args(args: &[String]) -> Result<CliArgs, StartupError> {
    match args {
        [] => Ok(CliArgs::default()),
        [only] => {
            if looks_numeric(only) {
                Ok(CliArgs {
                    port: Some(parse_port(only)?),
                    directory: None,
                })
            } else {
                Ok(CliArgs {
                    port: None,
                    directory: Some(only.clone()),
                })
            }
        }
        [port, directory, ..] => Ok(CliArgs {
            port: Some(parse_port(port)?),
            directory: Some(directory.clone()),
        }),
    }
}

fn looks_numeric(arg: &str) -> bool {
    arg.parse::<i64>().is_ok()
}

fn parse_port(arg: &str) -> Result<u16, StartupError> {
    match arg.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(StartupError::InvalidPort(arg.to_string())),
    }
}
