use std::path::{Path, PathBuf};

use rand::{distr::Alphanumeric, Rng};
use sea_orm::DatabaseConnection;

use crate::{
    model::file::FileDto,
    server::{
        data::file::{FileRepository, NewFile},
        error::{file::FileError, Error},
        model::db::FileModel,
    },
};

const STORED_NAME_LENGTH: usize = 32;

/// Random stored name keeping the extension of the uploaded file
fn stored_name(original_name: &str) -> String {
    let stem: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STORED_NAME_LENGTH)
        .map(char::from)
        .collect();

    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(extension) => format!("{}.{}", stem, extension.to_ascii_lowercase()),
        None => stem,
    }
}

/// An upload received from a multipart request
pub struct Upload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub event_id: Option<i32>,
    pub member_id: Option<i32>,
}

pub struct FileService<'a> {
    db: &'a DatabaseConnection,
    upload_dir: &'a Path,
    max_upload_bytes: u64,
}

impl<'a> FileService<'a> {
    /// Creates a new instance of [`FileService`]
    ///
    /// # Arguments
    /// - `upload_dir` - Directory uploaded bytes are written to
    /// - `max_upload_bytes` - Largest accepted upload
    pub fn new(db: &'a DatabaseConnection, upload_dir: &'a Path, max_upload_bytes: u64) -> Self {
        Self {
            db,
            upload_dir,
            max_upload_bytes,
        }
    }

    fn path_of(&self, file: &FileModel) -> PathBuf {
        self.upload_dir.join(&file.stored_name)
    }

    /// Writes an upload to disk and records it
    ///
    /// # Returns
    /// - `Ok(FileDto)` - The stored file
    /// - `Err(Error::FileError(FileError::TooLarge))` - Upload exceeds the limit
    /// - `Err(Error::IoError)` - Upload directory not writable
    pub async fn store(&self, upload: Upload) -> Result<FileDto, Error> {
        let size = upload.bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(FileError::TooLarge {
                size,
                max: self.max_upload_bytes,
            }
            .into());
        }

        let stored_name = stored_name(&upload.original_name);
        let path = self.upload_dir.join(&stored_name);

        tokio::fs::create_dir_all(self.upload_dir).await?;
        tokio::fs::write(&path, &upload.bytes).await?;

        let result = FileRepository::new(self.db)
            .create(NewFile {
                original_name: upload.original_name,
                stored_name,
                content_type: upload.content_type,
                size_bytes: size as i64,
                event_id: upload.event_id,
                member_id: upload.member_id,
            })
            .await;

        let file = match result {
            Ok(file) => file,
            Err(e) => {
                if let Err(io_err) = tokio::fs::remove_file(&path).await {
                    tracing::warn!("Failed to remove orphaned upload {:?}: {}", path, io_err);
                }
                return Err(e.into());
            }
        };

        tracing::info!(file_id = %file.id, "Stored upload {} ({} bytes)", file.original_name, size);

        Ok(file.into())
    }

    pub async fn list(&self) -> Result<Vec<FileDto>, Error> {
        let files = FileRepository::new(self.db).list().await?;

        Ok(files.into_iter().map(FileDto::from).collect())
    }

    pub async fn get(&self, file_id: i32) -> Result<FileDto, Error> {
        let file = self.find(file_id).await?;

        Ok(file.into())
    }

    /// File metadata together with its bytes
    pub async fn read(&self, file_id: i32) -> Result<(FileModel, Vec<u8>), Error> {
        let file = self.find(file_id).await?;
        let bytes = tokio::fs::read(self.path_of(&file)).await?;

        Ok((file, bytes))
    }

    /// Deletes the record and the stored bytes, a missing file on disk is ignored
    pub async fn delete(&self, file_id: i32) -> Result<(), Error> {
        let file = self.find(file_id).await?;

        FileRepository::new(self.db).delete(file.id).await?;

        match tokio::fs::remove_file(self.path_of(&file)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(file_id = %file.id, "Stored file was already missing");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    async fn find(&self, file_id: i32) -> Result<FileModel, Error> {
        FileRepository::new(self.db)
            .get(file_id)
            .await?
            .ok_or_else(|| FileError::NotFound(file_id).into())
    }
}

#[cfg(test)]
mod tests {
    use lionsclub_test_utils::prelude::*;

    use crate::server::service::file::{stored_name, Upload};

    async fn setup() -> Result<TestContext, TestError> {
        TestBuilder::new()
            .with_core_tables()
            .with_table(entity::prelude::File)
            .build()
            .await
    }

    fn upload(bytes: &[u8]) -> Upload {
        Upload {
            original_name: "Minutes.PDF".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: bytes.to_vec(),
            event_id: None,
            member_id: None,
        }
    }

    /// Expect random names to keep a sanitised extension
    #[test]
    fn stored_name_keeps_extension() {
        let name = stored_name("photo.JPG");
        let without_extension = stored_name("README");
        let odd_extension = stored_name("archive.tar/../x");

        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), 36);
        assert_eq!(without_extension.len(), 32);
        assert!(!odd_extension.contains('/'));
        assert_ne!(stored_name("a.txt"), stored_name("a.txt"));
    }

    mod store {
        use crate::server::{
            error::{file::FileError, Error},
            service::file::FileService,
        };

        use super::*;

        /// Expect the bytes on disk and a readable record
        #[tokio::test]
        async fn stores_and_reads_back() -> Result<(), TestError> {
            let test = setup().await?;
            let dir = tempfile::tempdir().unwrap();
            let service = FileService::new(&test.db, dir.path(), 1024);

            let file = service.store(upload(b"%PDF-1.7")).await.unwrap();
            let (model, bytes) = service.read(file.id).await.unwrap();

            assert_eq!(file.size_bytes, 8);
            assert_eq!(file.download_url, format!("/api/files/{}/download", file.id));
            assert!(model.stored_name.ends_with(".pdf"));
            assert_eq!(bytes, b"%PDF-1.7");

            Ok(())
        }

        /// Expect TooLarge above the configured limit
        #[tokio::test]
        async fn rejects_oversized_upload() -> Result<(), TestError> {
            let test = setup().await?;
            let dir = tempfile::tempdir().unwrap();
            let service = FileService::new(&test.db, dir.path(), 4);

            let result = service.store(upload(b"too large")).await;

            assert!(matches!(
                result,
                Err(Error::FileError(FileError::TooLarge { size: 9, max: 4 }))
            ));

            Ok(())
        }
    }

    mod delete {
        use crate::server::{
            error::{file::FileError, Error},
            service::file::FileService,
        };

        use super::*;

        /// Expect record and bytes to be removed
        #[tokio::test]
        async fn removes_record_and_bytes() -> Result<(), TestError> {
            let test = setup().await?;
            let dir = tempfile::tempdir().unwrap();
            let service = FileService::new(&test.db, dir.path(), 1024);
            let file = service.store(upload(b"data")).await.unwrap();

            service.delete(file.id).await.unwrap();

            assert!(matches!(
                service.get(file.id).await,
                Err(Error::FileError(FileError::NotFound(_)))
            ));
            assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

            Ok(())
        }
    }
}
