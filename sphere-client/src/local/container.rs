use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use sphere_core::DomainError;

/// JSON-файл с независимыми секциями по строковому ключу — дисковый аналог
/// браузерного localStorage. Чтение всегда идёт с диска, поэтому несколько
/// клиентов поверх одного файла видят записи друг друга; запись
/// переписывает файл целиком.
pub(crate) struct KeyedContainer {
    path: PathBuf,
    lock: Mutex<()>,
}

type Entries = HashMap<String, serde_json::Value>;

impl KeyedContainer {
    /// Открывает контейнер; отсутствующий файл трактуется как пустой.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let container = Self {
            path,
            lock: Mutex::new(()),
        };
        // Нечитаемый или повреждённый файл лучше обнаружить при открытии.
        container.load()?;
        Ok(container)
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DomainError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let entries = self.load()?;
        match entries.get(key) {
            Some(value) => Ok(Some(
                serde_json::from_value(value.clone()).map_err(store_err)?,
            )),
            None => Ok(None),
        }
    }

    pub(crate) fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), DomainError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        entries.insert(
            key.to_string(),
            serde_json::to_value(value).map_err(store_err)?,
        );
        self.flush(&entries)
    }

    fn load(&self) -> Result<Entries, DomainError> {
        match fs::read(&self.path) {
            Ok(raw) => serde_json::from_slice(&raw).map_err(store_err),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(store_err(err)),
        }
    }

    fn flush(&self, entries: &Entries) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(store_err)?;
        }
        let raw = serde_json::to_vec_pretty(entries).map_err(store_err)?;
        fs::write(&self.path, raw).map_err(store_err)
    }
}

fn store_err(err: impl std::fmt::Display) -> DomainError {
    DomainError::Store(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::KeyedContainer;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let path = dir.path().join("store.json");

        let container = KeyedContainer::open(&path).expect("container must open");
        container
            .put("numbers", &vec![1u32, 2, 3])
            .expect("put must succeed");
        drop(container);

        let container = KeyedContainer::open(&path).expect("container must reopen");
        let numbers: Option<Vec<u32>> = container.get("numbers").expect("get must succeed");
        assert_eq!(numbers, Some(vec![1, 2, 3]));
        let missing: Option<Vec<u32>> = container.get("absent").expect("get must succeed");
        assert_eq!(missing, None);
    }

    #[test]
    fn writers_over_the_same_file_see_each_other() {
        let dir = tempfile::tempdir().expect("tempdir must be created");
        let path = dir.path().join("store.json");

        let first = KeyedContainer::open(&path).expect("container must open");
        let second = KeyedContainer::open(&path).expect("container must open");

        first.put("shared", &"from first").expect("put must succeed");
        let seen: Option<String> = second.get("shared").expect("get must succeed");
        assert_eq!(seen.as_deref(), Some("from first"));
    }
}
