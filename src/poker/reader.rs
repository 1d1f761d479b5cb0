//! `read_hand_history(path, ...)`: one row per hand with knockout and stage columns.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use duckdb::{
    core::{DataChunkHandle, LogicalTypeHandle, LogicalTypeId},
    vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab},
};

use super::config::{ParserConfig, SourceOrder};
use super::dialect::FileKind;
use super::error::{ErrorAccumulator, FileError};
use super::interop::bind_info_ffi::{get_named_parameter_bigint, get_named_parameter_varchar};
use super::interop::chunk::{ChunkWriter, ColumnDef, ColumnType, OutputColumn};
use super::source::{
    CompressionMode, PendingRows, SharedState, acquire_rows, expand_paths, park_rows,
    read_dialect,
};
use super::timestamp::to_duckdb_timestamp;
use super::tournament::analyze_hand_history;
use super::types::HandRow;

#[repr(C)]
pub struct ReadHandHistoryBindData {
    paths: Vec<PathBuf>,
    compression: CompressionMode,
    config: ParserConfig,
}

#[repr(C)]
pub struct ReadHandHistoryInitData {
    state: Mutex<SharedState<HandRow>>,
}

pub struct ReadHandHistoryVTab;

const PATH_PATTERN_PARAM_INDEX: u64 = 0;
const HAND_COLUMN_COUNT: usize = 20;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum HandColumn {
    TournamentId = 0,
    HandId = 1,
    HandNumber = 2,
    StartedAt = 3,
    TableSize = 4,
    Players = 5,
    BigBlind = 6,
    HeroStack = 7,
    HeroContribution = 8,
    TotalPot = 9,
    HeroWonPot = 10,
    Eliminated = 11,
    HeroKo = 12,
    KoAttempts = 13,
    IsFinalTable = 14,
    IsFinalTableEntry = 15,
    IsEarlyFinal = 16,
    Stage = 17,
    ParseError = 18,
    Source = 19,
}

impl OutputColumn for HandColumn {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        HAND_COLUMNS[self as usize].name
    }
}

const HAND_COLUMNS: [ColumnDef; HAND_COLUMN_COUNT] = [
    ColumnDef {
        name: "tournament_id",
        logical_type: ColumnType::Varchar,
    },
    ColumnDef {
        name: "hand_id",
        logical_type: ColumnType::Varchar,
    },
    ColumnDef {
        name: "hand_number",
        logical_type: ColumnType::UInteger,
    },
    ColumnDef {
        name: "started_at",
        logical_type: ColumnType::Timestamp,
    },
    ColumnDef {
        name: "table_size",
        logical_type: ColumnType::UInteger,
    },
    ColumnDef {
        name: "players",
        logical_type: ColumnType::UInteger,
    },
    ColumnDef {
        name: "big_blind",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "hero_stack",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "hero_contribution",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "total_pot",
        logical_type: ColumnType::Bigint,
    },
    ColumnDef {
        name: "hero_won_pot",
        logical_type: ColumnType::Boolean,
    },
    ColumnDef {
        name: "eliminated",
        logical_type: ColumnType::Varchar,
    },
    ColumnDef {
        name: "hero_ko",
        logical_type: ColumnType::UInteger,
    },
    ColumnDef {
        name: "ko_attempts",
        logical_type: ColumnType::UInteger,
    },
    ColumnDef {
        name: "is_final_table",
        logical_type: ColumnType::Boolean,
    },
    ColumnDef {
        name: "is_final_table_entry",
        logical_type: ColumnType::Boolean,
    },
    ColumnDef {
        name: "is_early_final",
        logical_type: ColumnType::Boolean,
    },
    ColumnDef {
        name: "stage",
        logical_type: ColumnType::Varchar,
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

/// Validate named parameters into a `ParserConfig`. `None` means omitted or NULL.
fn build_config(
    hero: Option<String>,
    final_table_size: Option<i64>,
    min_ko_blind_level: Option<i64>,
    order: Option<String>,
) -> Result<ParserConfig, Box<dyn Error>> {
    let mut config = ParserConfig::default();

    if let Some(hero) = hero {
        if hero.trim().is_empty() {
            return Err("Invalid hero value ''. Expected a non-empty player name.".into());
        }
        config = config.with_hero(&hero);
    }

    if let Some(size) = final_table_size {
        config.final_table_size = u32::try_from(size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or_else(|| {
                format!(
                    "Invalid final_table_size value '{}'. Expected a positive integer.",
                    size
                )
            })?;
    }

    if let Some(level) = min_ko_blind_level {
        config.min_ko_blind_level = level;
    }

    if let Some(order) = order {
        config.source_order = SourceOrder::parse(&order)?;
    }

    Ok(config)
}

fn load_hand_rows(
    path: &Path,
    compression: CompressionMode,
    config: &ParserConfig,
) -> Result<Vec<HandRow>, FileError> {
    let text = read_dialect(path, compression, FileKind::HandHistory)?;
    let source = path.display().to_string();
    Ok(analyze_hand_history(&text, config)
        .into_iter()
        .map(|analyzed| HandRow::from_analyzed(analyzed, config, &source))
        .collect())
}

fn write_hand_row(writer: &mut ChunkWriter<'_>, row: &HandRow) -> Result<(), Box<dyn Error>> {
    let mut parse_error = ErrorAccumulator::default();
    if let Some(existing) = row.parse_error.as_deref() {
        parse_error.push(existing);
    }

    writer.write_varchar(
        HandColumn::TournamentId,
        row.tournament_id.as_deref(),
        &mut parse_error,
    )?;
    writer.write_varchar(HandColumn::HandId, Some(&row.hand_id), &mut parse_error)?;
    writer.write_u32(HandColumn::HandNumber, Some(row.hand_number));
    writer.write_timestamp(
        HandColumn::StartedAt,
        row.started_at.map(to_duckdb_timestamp),
    );
    writer.write_u32(HandColumn::TableSize, row.table_size);
    writer.write_u32(HandColumn::Players, Some(row.players));
    writer.write_i64(HandColumn::BigBlind, row.big_blind);
    writer.write_i64(HandColumn::HeroStack, row.hero_stack);
    writer.write_i64(HandColumn::HeroContribution, row.hero_contribution);
    writer.write_i64(HandColumn::TotalPot, Some(row.total_pot));
    writer.write_bool(HandColumn::HeroWonPot, row.hero_won_pot);
    writer.write_varchar(HandColumn::Eliminated, Some(&row.eliminated), &mut parse_error)?;
    writer.write_u32(HandColumn::HeroKo, Some(row.hero_ko));
    writer.write_u32(HandColumn::KoAttempts, Some(row.ko_attempts));
    writer.write_bool(HandColumn::IsFinalTable, row.is_final_table);
    writer.write_bool(HandColumn::IsFinalTableEntry, row.is_final_table_entry);
    writer.write_bool(HandColumn::IsEarlyFinal, row.is_early_final);
    writer.write_varchar(HandColumn::Stage, row.stage, &mut parse_error)?;
    writer.write_varchar(HandColumn::Source, Some(&row.source), &mut parse_error)?;
    writer.write_parse_error(HandColumn::ParseError, parse_error)?;

    writer.finish_row();
    Ok(())
}

impl VTab for ReadHandHistoryVTab {
    type InitData = ReadHandHistoryInitData;
    type BindData = ReadHandHistoryBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let pattern = bind.get_parameter(PATH_PATTERN_PARAM_INDEX).to_string();
        let compression = match get_named_parameter_varchar(bind, "compression")?.into_option() {
            Some(raw) => CompressionMode::parse(&raw)?,
            None => CompressionMode::Plain,
        };
        let config = build_config(
            get_named_parameter_varchar(bind, "hero")?.into_option(),
            get_named_parameter_bigint(bind, "final_table_size")?.into_option(),
            get_named_parameter_bigint(bind, "min_ko_blind_level")?.into_option(),
            get_named_parameter_varchar(bind, "order")?.into_option(),
        )?;
        let paths = expand_paths(&pattern)?;

        for column in HAND_COLUMNS.iter() {
            bind.add_result_column(column.name, column.logical_type.to_handle());
        }

        Ok(ReadHandHistoryBindData {
            paths,
            compression,
            config,
        })
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(ReadHandHistoryInitData {
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
        let mut current: Option<PendingRows<HandRow>> = None;

        while !chunk_writer.is_full() {
            if current.is_none() {
                current = acquire_rows(&init_data.state, &bind_data.paths, |path| {
                    load_hand_rows(path, bind_data.compression, &bind_data.config)
                })?;
                if current.is_none() {
                    break;
                }
            }

            if let Some(mut rows) = current.take()
                && let Some(row) = rows.next()
            {
                write_hand_row(&mut chunk_writer, &row)?;
                current = Some(rows);
            }
        }

        park_rows(&init_data.state, current)?;
        chunk_writer.set_output_len();
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![
            LogicalTypeHandle::from(LogicalTypeId::Varchar), // path pattern (required)
        ])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(vec![
            (
                "hero".to_string(),
                LogicalTypeHandle::from(LogicalTypeId::Varchar),
            ),
            (
                "final_table_size".to_string(),
                LogicalTypeHandle::from(LogicalTypeId::Bigint),
            ),
            (
                "min_ko_blind_level".to_string(),
                LogicalTypeHandle::from(LogicalTypeId::Bigint),
            ),
            (
                "order".to_string(),
                LogicalTypeHandle::from(LogicalTypeId::Varchar),
            ),
            (
                "compression".to_string(),
                LogicalTypeHandle::from(LogicalTypeId::Varchar),
            ),
        ])
    }
}
