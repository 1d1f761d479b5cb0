//! `read_tournament_summary(path, ...)`: one row per summary file, bounty tiers included.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use duckdb::{
    core::{DataChunkHandle, LogicalTypeHandle, LogicalTypeId},
    vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab},
};

use super::dialect::FileKind;
use super::error::{ErrorAccumulator, FileError};
use super::interop::bind_info_ffi::get_named_parameter_varchar;
use super::interop::chunk::{ChunkWriter, ColumnDef, ColumnType, OutputColumn};
use super::source::{
    CompressionMode, PendingRows, SharedState, acquire_rows, expand_paths, park_rows,
    read_dialect,
};
use super::summary::parse_summary;
use super::timestamp::to_duckdb_timestamp;
use super::types::SummaryRow;

#[repr(C)]
pub struct ReadSummaryBindData {
    paths: Vec<PathBuf>,
    compression: CompressionMode,
}

#[repr(C)]
pub struct ReadSummaryInitData {
    state: Mutex<SharedState<SummaryRow>>,
}

pub struct ReadTournamentSummaryVTab;

const SUMMARY_COLUMN_COUNT: usize = 17;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SummaryColumn {
    TournamentId = 0,
    TournamentName = 1,
    StartedAt = 2,
    BuyIn = 3,
    Players = 4,
    FinishPlace = 5,
    Payout = 6,
    Bounty = 7,
    KoX10000 = 8,
    KoX1000 = 9,
    KoX100 = 10,
    KoX10 = 11,
    KoX2 = 12,
    KoX1p5 = 13,
    KoRemainder = 14,
    ParseError = 15,
    Source = 16,
}

impl OutputColumn for SummaryColumn {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        SUMMARY_COLUMNS[self as usize].name
    }
}

/// Tier columns in the same order as the decomposition counts.
const TIER_COLUMNS: [SummaryColumn; 6] = [
    SummaryColumn::KoX10000,
    SummaryColumn::KoX1000,
    SummaryColumn::KoX100,
    SummaryColumn::KoX10,
    SummaryColumn::KoX2,
    SummaryColumn::KoX1p5,
];

const SUMMARY_COLUMNS: [ColumnDef; SUMMARY_COLUMN_COUNT] = [
    ColumnDef {
        name: "tournament_id",
        logical_type: ColumnType::Varchar,
    },
    ColumnDef {
        name: "tournament_name",
        logical_type: ColumnType::Varchar,
    },
    ColumnDef {
        name: "started_at",
        logical_type: ColumnType::Timestamp,
    },
    ColumnDef {
        name: "buy_in",
        logical_type: ColumnType::Double,
    },
    ColumnDef {
        name: "players",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "finish_place",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "payout",
        logical_type: ColumnType::Double,
    },
    ColumnDef {
        name: "bounty",
        logical_type: ColumnType::Double,
    },
    ColumnDef {
        name: "ko_x10000",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "ko_x1000",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "ko_x100",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "ko_x10",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "ko_x2",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "ko_x1_5",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "ko_remainder",
        logical_type: ColumnType::Double,
    },
    ColumnDef {
        name: "parse_error",
        logical_type: ColumnType::Varchar,
    },
    ColumnDef {
        name: "source",
        logical_type: ColumnType::Varchar,
    },
];

fn load_summary_rows(
    path: &Path,
    compression: CompressionMode,
) -> Result<Vec<SummaryRow>, FileError> {
    let text = read_dialect(path, compression, FileKind::TournamentSummary)?;
    let source = path.display().to_string();
    Ok(vec![SummaryRow::from_summary(parse_summary(&text), &source)])
}

fn write_summary_row(
    writer: &mut ChunkWriter<'_>,
    row: &SummaryRow,
) -> Result<(), Box<dyn Error>> {
    let mut parse_error = ErrorAccumulator::default();
    if let Some(existing) = row.parse_error.as_deref() {
        parse_error.push(existing);
    }

    writer.write_varchar(
        SummaryColumn::TournamentId,
        row.tournament_id.as_deref(),
        &mut parse_error,
    )?;
    writer.write_varchar(
        SummaryColumn::TournamentName,
        row.tournament_name.as_deref(),
        &mut parse_error,
    )?;
    writer.write_timestamp(
        SummaryColumn::StartedAt,
        row.started_at.map(to_duckdb_timestamp),
    );
    writer.write_f64(SummaryColumn::BuyIn, row.buy_in);
    writer.write_i64(SummaryColumn::Players, row.players);
    writer.write_i64(SummaryColumn::FinishPlace, row.finish_place);
    writer.write_f64(SummaryColumn::Payout, row.payout);
    writer.write_f64(SummaryColumn::Bounty, row.bounty);
    for (idx, column) in TIER_COLUMNS.iter().enumerate() {
        writer.write_i64(*column, row.tier_count(idx));
    }
    writer.write_f64(
        SummaryColumn::KoRemainder,
        row.decomposition.map(|d| d.remainder),
    );
    writer.write_varchar(SummaryColumn::Source, Some(&row.source), &mut parse_error)?;
    writer.write_parse_error(SummaryColumn::ParseError, parse_error)?;

    writer.finish_row();
    Ok(())
}

impl VTab for ReadTournamentSummaryVTab {
    type InitData = ReadSummaryInitData;
    type BindData = ReadSummaryBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let pattern = bind.get_parameter(0).to_string();
        let compression = match get_named_parameter_varchar(bind, "compression")?.into_option() {
            Some(raw) => CompressionMode::parse(&raw)?,
            None => CompressionMode::Plain,
        };
        let paths = expand_paths(&pattern)?;

        for column in SUMMARY_COLUMNS.iter() {
            bind.add_result_column(column.name, column.logical_type.to_handle());
        }

        Ok(ReadSummaryBindData { paths, compression })
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(ReadSummaryInitData {
            state: Mutex::new(SharedState::default()),
        })
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init_data = func.get_init_data();
        let bind_data = func.get_bind_data();
        let mut chunk_writer = ChunkWriter::new(output);
        let mut current: Option<PendingRows<SummaryRow>> = None;

        while !chunk_writer.is_full() {
            if current.is_none() {
                current = acquire_rows(&init_data.state, &bind_data.paths, |path| {
                    load_summary_rows(path, bind_data.compression)
                })?;
                if current.is_none() {
                    break;
                }
            }

            if let Some(mut rows) = current.take()
                && let Some(row) = rows.next()
            {
                write_summary_row(&mut chunk_writer, &row)?;
                current = Some(rows);
            }
        }

        park_rows(&init_data.state, current)?;
        chunk_writer.set_output_len();
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![LogicalTypeHandle::from(LogicalTypeId::Varchar)])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(vec![(
            "compression".to_string(),
            LogicalTypeHandle::from(LogicalTypeId::Varchar),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poker::bounty::TIER_LABELS;
    use std::fs;

    #[test]
    fn test_summary_columns_match_contract() {
        let names: Vec<&str> = SUMMARY_COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "tournament_id",
                "tournament_name",
                "started_at",
                "buy_in",
                "players",
                "finish_place",
                "payout",
                "bounty",
                "ko_x10000",
                "ko_x1000",
                "ko_x100",
                "ko_x10",
                "ko_x2",
                "ko_x1_5",
                "ko_remainder",
                "parse_error",
                "source",
            ]
        );
        assert_eq!(SummaryColumn::Source.index(), SUMMARY_COLUMN_COUNT - 1);
    }

    #[test]
    fn test_tier_columns_follow_tier_labels() {
        for (column, label) in TIER_COLUMNS.iter().zip(TIER_LABELS) {
            let expected = format!("ko_{}", label.replace('.', "_"));
            assert_eq!(column.name(), expected);
        }
    }

    #[test]
    fn test_load_summary_rows_from_zstd_file() {
        let text = "Tournament #206881959, Mystery Battle Royale $1, Hold'em No Limit\nBuy-in: $0.5+$0.08+$0.42\n9 Players\nTournament started 2025/01/01 16:30:00\nYou finished the tournament in 4th place.\nYou received a total of $21.5.\n";
        let dir = std::env::temp_dir().join(format!("duckdb_poker_summary_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("summary.txt.zst");
        fs::write(&path, zstd::stream::encode_all(text.as_bytes(), 0).unwrap()).unwrap();

        let rows = load_summary_rows(&path, CompressionMode::Zstd).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.tournament_id.as_deref(), Some("206881959"));
        assert_eq!(row.buy_in, Some(1.0));
        assert_eq!(row.bounty, Some(21.5));
        assert_eq!(row.tier_count(3), Some(2));
        assert_eq!(row.tier_count(5), Some(1));
    }
}
