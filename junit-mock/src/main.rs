use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use junit_mock::JunitMock;

#[derive(Debug, Parser)]
pub struct Cli {
    /// Directory to output JUnit XML files
    #[arg(required = true)]
    pub directory: PathBuf,

    /// Number of reports to generate
    #[arg(long, default_value = "1")]
    pub report_count: usize,

    #[command(flatten)]
    pub options: junit_mock::Options,
}

fn main() -> Result<()> {
    let Cli {
        directory,
        report_count,
        options,
    } = Cli::try_parse()?;

    let mut jm = JunitMock::new(options);
    println!("Using seed `{}` to generate random data.", jm.get_seed());

    let reports: Vec<_> = (0..report_count).map(|_| jm.generate_report()).collect();
    for path in jm.write_reports_to_file(directory, &reports)? {
        println!("Wrote {}", path.display());
    }

    Ok(())
}
