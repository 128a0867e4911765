use std::path::PathBuf;

use clap::{Parser, Subcommand};

// ///////////// //
// CLI interface //
// ///////////// //

/// cups2cloud - Presents CUPS printers and jobs the way a cloud print service expects them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints all CUPS printers as JSON.
    Printers {
        /// Keep printing the printers every poll interval.
        #[arg(long)]
        watch: bool,
    },
    /// Prints the state of a CUPS job as JSON.
    JobState {
        job_id: u32,
    },
    /// Submits a document to a printer.
    Print {
        #[arg(long)]
        printer: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        title: String,
        /// Requesting user, defaults to the configured one.
        #[arg(long)]
        user: Option<String>,
        /// JSON file holding a cloud job ticket.
        #[arg(long)]
        ticket: Option<PathBuf>,
    },
    /// Prints the manufacturer, the model and the PPD of a printer.
    Ppd {
        printer: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_print() {
        let cli = Cli::parse_from(["cups2cloud", "print", "--printer", "laser", "--file", "doc.pdf", "--title", "Doc"]);
        match cli.command {
            Some(Commands::Print { printer, file, title, user, ticket }) => {
                assert_eq!(printer, "laser");
                assert_eq!(file, PathBuf::from("doc.pdf"));
                assert_eq!(title, "Doc");
                assert!(user.is_none());
                assert!(ticket.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn no_subcommand() {
        assert!(Cli::parse_from(["cups2cloud"]).command.is_none());
    }
}
