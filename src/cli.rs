//! Command-line interface definitions using clap

use clap::Parser;

/// Demo server for the UTM attribution middleware
#[derive(Parser, Debug)]
#[command(name = "utm-attribution")]
#[command(version)]
#[command(about = "Serve requests through the UTM attribution middleware", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./config.toml if present)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    pub print_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_flag() {
        let cli = Cli::try_parse_from(["utm-attribution", "-c", "custom.toml"]).expect("parses");
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert!(!cli.print_config);

        let cli = Cli::try_parse_from(["utm-attribution", "--print-config"]).expect("parses");
        assert!(cli.print_config);
        assert!(cli.config.is_none());
    }
}
