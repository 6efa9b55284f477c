use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "todohd",
    about = concat!("todohd v", env!("CARGO_PKG_VERSION"), " - organize stuff you need to do"),
    version
)]
pub struct Cli {
    /// Directory holding todohd.json (`.` for the current directory).
    /// Defaults to the directory of the executable.
    pub dir: Option<PathBuf>,

    /// Use this data file instead
    #[arg(long, value_name = "PATH", conflicts_with = "dir")]
    pub file: Option<PathBuf>,

    /// Print all items in display order and exit
    #[arg(long, conflicts_with = "single")]
    pub list: bool,

    /// Print the first item whose title contains TEXT and exit
    #[arg(long, value_name = "TEXT")]
    pub single: Option<String>,

    /// Output --list/--single as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// True when a print command was given instead of the UI
    pub fn is_print(&self) -> bool {
        self.list || self.single.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_dir_and_flags() {
        let cli = Cli::try_parse_from(["todohd", ".", "--list", "--json"]).unwrap();
        assert_eq!(cli.dir.as_deref(), Some(std::path::Path::new(".")));
        assert!(cli.list);
        assert!(cli.json);
        assert!(cli.is_print());

        let cli = Cli::try_parse_from(["todohd", "--single", "buy milk"]).unwrap();
        assert_eq!(cli.single.as_deref(), Some("buy milk"));
    }

    #[test]
    fn file_and_dir_conflict() {
        assert!(Cli::try_parse_from(["todohd", ".", "--file", "x.json"]).is_err());
        assert!(Cli::try_parse_from(["todohd", "--list", "--single", "x"]).is_err());
    }
}
