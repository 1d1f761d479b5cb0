mod bounty;
mod config;
mod dialect;
mod error;
mod functions;
mod hand;
mod interop;
mod knockout;
mod ledger;
mod lines;
mod log;
mod pots;
mod reader;
mod source;
mod stage;
mod summary;
mod summary_reader;
mod timestamp;
mod tournament;
mod types;

use duckdb::{Connection, Result};
use duckdb_ext_macros::duckdb_extension;
use functions::{BountyDecomposeScalar, FileKindScalar, StageBucketScalar};
use reader::ReadHandHistoryVTab;
use std::error::Error;
use summary_reader::ReadTournamentSummaryVTab;

#[duckdb_extension(name = "duckdb_poker", api_version = "v1.0.0")]
pub unsafe fn extension_entrypoint(con: Connection) -> Result<(), Box<dyn Error>> {
    // Table functions
    con.register_table_function::<ReadHandHistoryVTab>("read_hand_history")?;
    con.register_table_function::<ReadTournamentSummaryVTab>("read_tournament_summary")?;

    // Scalar functions
    con.register_scalar_function::<BountyDecomposeScalar>("poker_bounty_decompose")?;
    con.register_scalar_function::<StageBucketScalar>("poker_stage_bucket")?;
    con.register_scalar_function::<FileKindScalar>("poker_file_kind")?;

    Ok(())
}
