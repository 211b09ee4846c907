//! JSON exporter for captured frames.
//!
//! Exports every captured snapshot (live cells plus census summary) so a run
//! can be replayed or inspected offline.

use life_core::{Census, Generation};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// A single captured frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame number (0 = first capture)
    pub frame: u64,

    /// Virtual or wall time of capture, seconds since run start
    pub time_sec: f64,

    /// Generation index at capture
    pub generation: u64,

    /// Number of live cells
    pub live_cells: usize,

    /// Live cells as `[x, y]`, sorted
    pub cells: Vec<[i32; 2]>,

    /// Shapes seen in this frame, most frequent first
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub patterns: Vec<PatternCount>,
}

impl FrameRecord {
    /// Builds a record from a snapshot and its census.
    pub fn capture(frame: u64, time_sec: f64, generation: &Generation, census: &Census) -> Self {
        Self {
            frame,
            time_sec,
            generation: generation.index,
            live_cells: generation.live_count(),
            cells: generation
                .grid
                .sorted_cells()
                .into_iter()
                .map(|c| [c.x, c.y])
                .collect(),
            patterns: census
                .frequent(0)
                .into_iter()
                .map(|(shape, count)| PatternCount {
                    label: shape.label(),
                    count,
                })
                .collect(),
        }
    }
}

/// Shape occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCount {
    pub label: String,
    pub count: usize,
}

/// Complete run export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Run identifier
    pub run_id: String,

    /// Seed used
    pub seed: u64,

    /// Domain side length
    pub grid_size: u32,

    /// Worker pool size
    pub workers: usize,

    /// Duration in seconds
    pub duration_sec: f64,

    /// All frames
    pub frames: Vec<FrameRecord>,

    /// Generation reached when the run stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_generation: Option<u64>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(run_id: &str, seed: u64, grid_size: u32, workers: usize) -> Self {
        Self {
            run_id: run_id.to_string(),
            seed,
            grid_size,
            workers,
            duration_sec: 0.0,
            frames: Vec::new(),
            final_generation: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: FrameRecord) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, final_generation: u64) {
        self.final_generation = Some(final_generation);
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::SparseGrid;

    #[test]
    fn test_frame_capture() {
        let generation = Generation {
            index: 12,
            grid: SparseGrid::from_cells([(6, 5), (4, 5), (5, 5)]),
        };
        let census = Census::of(&generation.grid);

        let record = FrameRecord::capture(3, 1.5, &generation, &census);

        assert_eq!(record.generation, 12);
        assert_eq!(record.live_cells, 3);
        assert_eq!(record.cells, vec![[4, 5], [5, 5], [6, 5]]);
        assert_eq!(
            record.patterns,
            vec![PatternCount {
                label: "blinker".to_string(),
                count: 1
            }]
        );
    }

    #[test]
    fn test_export_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        let mut export = SimExport::new("deadbeef", 42, 10, 4);
        let generation = Generation::initial(SparseGrid::new());
        export.add_frame(FrameRecord::capture(0, 2.0, &generation, &Census::default()));
        export.finalize(99);
        export.write_to_file(path.to_str().unwrap()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: SimExport = serde_json::from_str(&text).unwrap();

        assert_eq!(back.seed, 42);
        assert_eq!(back.duration_sec, 2.0);
        assert_eq!(back.final_generation, Some(99));
        assert!(back.frames[0].patterns.is_empty());
        assert!(!text.contains("\"patterns\""));
    }
}
