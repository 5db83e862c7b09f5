// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "gdi-replay")]
#[command(about = "Replay a recorded GDI drawing session", long_about = None)]
pub struct Cli {
    /// JSON drawing script to replay
    #[arg(long)]
    pub script: PathBuf,

    /// Write the dirty region of the primary surface to this PPM file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Override the desktop width from the script
    #[arg(long)]
    pub width: Option<u32>,

    /// Override the desktop height from the script
    #[arg(long)]
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from(["gdi-replay", "--script", "s.json", "--width", "640"]);
        assert_eq!(cli.script, PathBuf::from("s.json"));
        assert_eq!(cli.width, Some(640));
        assert!(cli.output.is_none());
        assert!(cli.height.is_none());
    }

    #[test]
    fn test_script_required() {
        assert!(Cli::try_parse_from(["gdi-replay"]).is_err());
    }
}
