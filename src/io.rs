//! Reading, writing and reporting boards.
//!
//! Text boards are one row per line with values separated by commas or
//! whitespace; `0` marks a blank. Files ending in `.csv` are written with
//! the `csv` crate, anything else as space-separated lines.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::board::{BlockShape, Board};
use crate::error::{SudokuError, SudokuResult};
use crate::metrics::RunMetrics;

/// Parses a board from text.
///
/// Blank lines are skipped. A line containing a comma is split on commas,
/// any other line on whitespace.
///
/// # Errors
///
/// - [`SudokuError::Parse`] for a non-numeric token or input with no rows
/// - [`SudokuError::InvalidShape`] for a non-square grid or unsupported size
/// - [`SudokuError::InvalidValue`] for a value above the board size
///
/// ```
/// use sudoku_ga::io::parse_board;
///
/// let board = parse_board("1,0,0,4\n0 0 1 0\n0 1 0 0\n4 0 0 1\n")?;
/// assert_eq!(board.size(), 4);
/// assert_eq!(board.given_count(), 6);
/// # Ok::<(), sudoku_ga::SudokuError>(())
/// ```
pub fn parse_board(text: &str) -> SudokuResult<Board> {
    let mut grid: Vec<Vec<u32>> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let tokens: Vec<&str> = if line.contains(',') {
            line.split(',').map(str::trim).filter(|t| !t.is_empty()).collect()
        } else {
            line.split_whitespace().collect()
        };

        let row = tokens
            .iter()
            .map(|t| {
                t.parse::<u32>()
                    .map_err(|_| SudokuError::Parse(format!("non-numeric value '{t}'")))
            })
            .collect::<SudokuResult<Vec<u32>>>()?;

        if !row.is_empty() {
            grid.push(row);
        }
    }

    if grid.is_empty() {
        return Err(SudokuError::Parse("input contains no board rows".into()));
    }

    let size = grid.len();
    if let Some((r, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != size) {
        return Err(SudokuError::InvalidShape(format!(
            "board must be square: row {} has {} values, expected {}",
            r,
            row.len(),
            size
        )));
    }
    if BlockShape::for_size(size).is_none() {
        return Err(SudokuError::InvalidShape(format!("unsupported size {size}")));
    }
    if let Some(&value) = grid.iter().flatten().find(|&&v| v as usize > size) {
        return Err(SudokuError::InvalidValue { value, size });
    }

    let rows: Vec<Vec<u8>> = grid
        .into_iter()
        .map(|row| row.into_iter().map(|v| v as u8).collect())
        .collect();
    Board::from_rows(&rows)
}

/// Loads a board from a text or CSV file.
pub fn load_board(path: impl AsRef<Path>) -> SudokuResult<Board> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let board = parse_board(&text)?;
    debug!(path = %path.display(), size = board.size(), "loaded board");
    Ok(board)
}

/// Saves the board's current values.
///
/// A `.csv` extension (any case) writes CSV; anything else writes one
/// space-separated row per line.
pub fn save_board(board: &Board, path: impl AsRef<Path>) -> SudokuResult<()> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        for row in board.rows() {
            writer.write_record(row.iter().map(u8::to_string))?;
        }
        writer.flush()?;
    } else {
        fs::write(path, to_plain_text(board))?;
    }

    debug!(path = %path.display(), csv = is_csv, "saved board");
    Ok(())
}

/// Space-separated rows, one per line, `0` for blanks.
pub fn to_plain_text(board: &Board) -> String {
    let mut out = String::new();
    for row in board.rows() {
        let line: Vec<String> = row.iter().map(u8::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// Writes the final board and run metrics as a sectioned text report.
pub fn write_report<W: Write>(
    board: &Board,
    metrics: &RunMetrics,
    writer: &mut W,
) -> SudokuResult<()> {
    writeln!(writer, "# FINAL BOARD")?;
    write!(writer, "{}", to_plain_text(board))?;

    writeln!(writer)?;
    writeln!(writer, "# RUN")?;
    writeln!(writer, "run_id: {}", metrics.run_id)?;
    writeln!(writer, "started_at_ms: {}", metrics.started_at_ms)?;
    writeln!(writer, "duration: {:.3} s", metrics.duration.as_secs_f64())?;
    writeln!(writer, "size: {}", metrics.board_size)?;
    match metrics.difficulty {
        Some(d) => writeln!(writer, "difficulty: {d}")?,
        None => writeln!(writer, "difficulty: none")?,
    }

    let config = &metrics.config;
    writeln!(writer)?;
    writeln!(writer, "# GA PARAMETERS")?;
    writeln!(writer, "population_size: {}", config.population_size)?;
    writeln!(writer, "max_generations: {}", config.max_generations)?;
    writeln!(writer, "mutation_rate: {}", config.mutation_rate)?;
    writeln!(writer, "elite_ratio: {}", config.elite_ratio)?;
    writeln!(writer, "crossover_rate: {}", config.crossover_rate)?;
    writeln!(writer, "stagnation_threshold: {}", config.stagnation_threshold)?;
    match config.seed {
        Some(seed) => writeln!(writer, "seed: {seed}")?,
        None => writeln!(writer, "seed: none")?,
    }

    writeln!(writer)?;
    writeln!(writer, "# RESULTS")?;
    writeln!(writer, "initial_penalty: {}", metrics.initial_penalty)?;
    writeln!(writer, "final_penalty: {}", metrics.final_penalty)?;
    writeln!(writer, "best_penalty: {}", metrics.best_penalty)?;
    writeln!(writer, "best_generation: {}", metrics.best_generation)?;
    writeln!(writer, "generations: {}", metrics.generations)?;
    writeln!(writer, "cause: {}", metrics.cause)?;

    writeln!(writer)?;
    writeln!(writer, "# FITNESS HISTORY")?;
    let history: Vec<String> = metrics.fitness_history.iter().map(u32::to_string).collect();
    writeln!(writer, "{}", history.join(", "))?;
    Ok(())
}

/// Writes the report to a file, replacing it if present.
pub fn export_report(
    board: &Board,
    metrics: &RunMetrics,
    path: impl AsRef<Path>,
) -> SudokuResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_report(board, metrics, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GaConfig, GaRunner};
    use crate::generator::{self, Difficulty};
    use crate::random::create_rng;
    use std::time::{Duration, UNIX_EPOCH};

    const PUZZLE_4X4: &str = "1 0 0 4\n0 0 1 0\n0 1 0 0\n4 0 0 1\n";

    #[test]
    fn test_parse_space_and_comma() {
        let a = parse_board(PUZZLE_4X4).unwrap();
        let b = parse_board("1,0,0,4\n0, 0, 1, 0\n\n0,1,0,0\n4,0,0,1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(0, 3), 4);
        assert!(a.is_given(3, 0));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        let err = parse_board("1 0 x 4\n0 0 1 0\n0 1 0 0\n4 0 0 1");
        assert!(matches!(err, Err(SudokuError::Parse(_))));
        let err = parse_board("-1 0 0 4\n0 0 1 0\n0 1 0 0\n4 0 0 1");
        assert!(matches!(err, Err(SudokuError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(parse_board(""), Err(SudokuError::Parse(_))));
        assert!(matches!(parse_board("\n  \n"), Err(SudokuError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        let err = parse_board("1 0 0 4\n0 0 1\n0 1 0 0\n4 0 0 1");
        assert!(matches!(err, Err(SudokuError::InvalidShape(_))));
        let err = parse_board("0 0 0\n0 0 0\n0 0 0");
        assert!(matches!(err, Err(SudokuError::InvalidShape(_))));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let err = parse_board("1 0 0 400\n0 0 1 0\n0 1 0 0\n4 0 0 1");
        assert!(matches!(
            err,
            Err(SudokuError::InvalidValue { value: 400, size: 4 })
        ));
    }

    #[test]
    fn test_save_and_load_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.txt");
        let board = parse_board(PUZZLE_4X4).unwrap();

        save_board(&board, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), PUZZLE_4X4);
        assert_eq!(load_board(&path).unwrap(), board);
    }

    #[test]
    fn test_save_and_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.CSV");
        let mut rng = create_rng(3);
        let board = generator::generate_puzzle(9, Difficulty::Easy, &mut rng)
            .unwrap()
            .puzzle;

        save_board(&board, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 9);
        assert!(text.lines().all(|l| l.split(',').count() == 9));
        assert_eq!(load_board(&path).unwrap(), board);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_board(dir.path().join("missing.txt"));
        assert!(matches!(err, Err(SudokuError::Io(_))));
    }

    #[test]
    fn test_report_sections() {
        let board = parse_board(PUZZLE_4X4).unwrap();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(50)
            .with_seed(4)
            .with_parallel(false);
        let result = GaRunner::run(&board, &config).unwrap();
        let mut metrics = RunMetrics::from_result(
            &board,
            Some(Difficulty::Easy),
            &config,
            &result,
            UNIX_EPOCH,
            Duration::from_millis(1_250),
        );
        metrics.run_id = 3;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        export_report(&result.best, &metrics, &path).unwrap();
        let report = fs::read_to_string(&path).unwrap();

        for section in [
            "# FINAL BOARD",
            "# RUN",
            "# GA PARAMETERS",
            "# RESULTS",
            "# FITNESS HISTORY",
        ] {
            assert!(report.contains(section), "missing {section}");
        }
        assert!(report.contains("run_id: 3"));
        assert!(report.contains("duration: 1.250 s"));
        assert!(report.contains("difficulty: easy"));
        assert!(report.contains("population_size: 20"));
        assert!(report.contains(&format!("cause: {}", result.cause)));
        assert!(report.starts_with(&format!("# FINAL BOARD\n{}", to_plain_text(&result.best))));

        let history = report.lines().last().unwrap();
        assert_eq!(history.split(", ").count(), result.generations);
    }
}
