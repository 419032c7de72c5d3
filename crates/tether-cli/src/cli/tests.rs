#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["tether", "serve"]);
        match cli.command {
            Command::Serve(args) => {
                assert!(args.config.is_none());
                assert!(args.port.is_none());
                assert!(args.base_dir.is_none());
                assert!(!args.no_reload);
                assert!(!args.open);
            }
            _ => panic!("Expected serve command"),
        }
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "tether",
            "serve",
            "--port",
            "8080",
            "--base-dir",
            "public",
            "--no-reload",
            "--config",
            "custom.json",
        ]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.base_dir, Some(PathBuf::from("public")));
                assert_eq!(args.config, Some(PathBuf::from("custom.json")));
                assert!(args.no_reload);
            }
            _ => panic!("Expected serve command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tether", "check", "--verbose", "--no-color"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["tether", "--verbose", "--quiet", "serve"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = Cli::try_parse_from(["tether", "serve", "--port", "70000"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_force() {
        let cli = Cli::parse_from(["tether", "init", "--force"]);
        match cli.command {
            Command::Init(args) => assert!(args.force),
            _ => panic!("Expected init command"),
        }
    }
}
