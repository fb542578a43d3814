use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::model::task::Task;
use crate::repository::traits::{PreferenceRepository, SnapshotRepository};

const TASKS_FILE_NAME: &str = "todos.json";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Display preferences live in their own file so a corrupt task list
/// does not take the theme down with it (and vice versa).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
struct Settings {
    dark_mode: bool,
}

#[derive(Clone)]
pub struct FileRepository {
    dir: PathBuf,
}

impl FileRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self, StorageError> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir().ok_or_else(|| {
                    StorageError::Unavailable("could not determine home directory".to_string())
                })?;
                home_dir.join(".tasklist")
            }
        };
        fs::create_dir_all(&dir)?;

        let repo = FileRepository { dir };

        // Initialize an empty list on first run so `load` never has to
        // special-case a missing file.
        if !repo.tasks_path().exists() {
            repo.write_tasks(&[])?;
        }

        Ok(repo)
    }

    fn tasks_path(&self) -> PathBuf {
        self.dir.join(TASKS_FILE_NAME)
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE_NAME)
    }

    fn read_settings(&self) -> Result<Settings, StorageError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Settings::default());
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn write_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let mut writer = BufWriter::new(File::create(self.settings_path())?);
        serde_json::to_writer_pretty(&mut writer, settings)?;
        writer.flush()?;
        Ok(())
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let mut writer = BufWriter::new(File::create(self.tasks_path())?);
        serde_json::to_writer_pretty(&mut writer, tasks)?;
        writer.flush()?;
        Ok(())
    }
}

impl SnapshotRepository for FileRepository {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        let reader = BufReader::new(File::open(self.tasks_path())?);
        let tasks = serde_json::from_reader(reader)?;
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        self.write_tasks(tasks)
    }
}

impl PreferenceRepository for FileRepository {
    fn load_dark_mode(&self) -> Result<bool, StorageError> {
        Ok(self.read_settings()?.dark_mode)
    }

    fn save_dark_mode(&self, dark_mode: bool) -> Result<(), StorageError> {
        self.write_settings(&Settings { dark_mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;

    #[test]
    fn test_new_initializes_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let mut first = Task::new("first".to_string());
        first.priority = Priority::High;
        let second = Task::new("second".to_string());
        let tasks = vec![first, second];

        repo.save(&tasks).unwrap();
        assert_eq!(repo.load().unwrap(), tasks);
    }

    #[test]
    fn test_dark_mode_defaults_false_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(Some(dir.path().to_path_buf())).unwrap();

        assert!(!repo.load_dark_mode().unwrap());
        repo.save_dark_mode(true).unwrap();
        assert!(repo.load_dark_mode().unwrap());
    }

    #[test]
    fn test_corrupt_tasks_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.tasks_path(), "not json").unwrap();
        assert!(matches!(repo.load(), Err(StorageError::Encoding(_))));
    }
}
