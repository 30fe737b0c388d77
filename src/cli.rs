// CLI definitions using clap

use crate::config::ProfileKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "padmap")]
#[command(author, version, about = "Touchpad controller remapping daemon")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/padmap/padmap.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Controller event node, overrides the config file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Profile to run, overrides the config file
    #[arg(short, long, global = true, value_enum)]
    pub profile: Option<ProfileKind>,

    /// Leave the controller ungrabbed so other clients still see it
    #[arg(long, global = true)]
    pub no_grab: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remap the controller until interrupted (default)
    Run,

    /// List input devices
    #[command(visible_aliases = ["list", "ls"])]
    ListDevices,

    /// Print every event code name the config accepts
    Codes,

    /// Validate the config and print it with defaults filled in
    #[command(visible_alias = "check")]
    CheckConfig,

    /// Play the configured startup rumble and periodic effect
    TestHaptics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_run() {
        let cli = Cli::try_parse_from(["padmap"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.no_grab);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_profile_after_subcommand() {
        let cli = Cli::try_parse_from(["padmap", "check", "--profile", "gyro-mouse"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.profile, Some(ProfileKind::GyroMouse));
    }

    #[test]
    fn test_haptics_subcommand_takes_config() {
        let cli = Cli::try_parse_from(["padmap", "test-haptics", "-c", "/tmp/pad.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::TestHaptics)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/pad.toml")));
    }

    #[test]
    fn test_rejects_unknown_profile() {
        assert!(Cli::try_parse_from(["padmap", "--profile", "joystick"]).is_err());
    }
}
