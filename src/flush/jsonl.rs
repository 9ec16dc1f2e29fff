use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use bevy_ecs::world::World;
use serde::Serialize;

use crate::ecs::pai::snapshot_all;
use crate::ecs::resources::DeviceLog;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Flush device state to JSONL files in `output_dir`, creating it if needed.
///
/// - `devices.jsonl`: one `DeviceSnapshot` per live device
/// - `device_log.jsonl`: every `DeviceRecord` accumulated since the last flush
///
/// The log is cleared after a successful write.
pub fn flush_to_jsonl(world: &mut World, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    let snapshots = snapshot_all(world);
    write_jsonl(&output_dir.join("devices.jsonl"), snapshots.iter())?;

    if let Some(mut log) = world.get_resource_mut::<DeviceLog>() {
        write_jsonl(&output_dir.join("device_log.jsonl"), log.records.iter())?;
        log.clear();
    }
    Ok(())
}
