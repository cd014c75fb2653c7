#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use aws_sdk_apprunner::types::{
    AuthenticationConfiguration, ImageConfiguration, ImageRepository, ImageRepositoryType,
    SourceConfiguration,
};
use deploy_hooks_lambda::adapters::deployment::DeploymentService;
use deploy_hooks_lambda::adapters::object_store::ObjectStore;
use deploy_hooks_lambda::config::SourceBundleConfig;
use tempfile::TempDir;

/// Ordered record of provider calls shared between fakes.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().expect("poisoned mutex").clone()
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub bucket: String,
    pub key: String,
    pub archive: Vec<u8>,
}

pub struct CapturingStore {
    journal: Journal,
    uploads: Mutex<Vec<Upload>>,
    failure: Option<String>,
}

impl CapturingStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            uploads: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(journal: Journal, message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(journal)
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().expect("poisoned mutex").clone()
    }
}

impl ObjectStore for CapturingStore {
    fn upload_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), String> {
        self.journal
            .lock()
            .expect("poisoned mutex")
            .push("upload_object".to_string());
        self.uploads.lock().expect("poisoned mutex").push(Upload {
            bucket: bucket.to_string(),
            key: key.to_string(),
            archive: body.to_vec(),
        });
        match &self.failure {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}

pub struct FakeDeployments {
    journal: Journal,
    configuration: SourceConfiguration,
    describe_failure: Option<String>,
    update_failure: Option<String>,
    updates: Mutex<Vec<(String, SourceConfiguration)>>,
}

impl FakeDeployments {
    pub fn new(journal: Journal, configuration: SourceConfiguration) -> Self {
        Self {
            journal,
            configuration,
            describe_failure: None,
            update_failure: None,
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_describe(journal: Journal, message: &str) -> Self {
        Self {
            describe_failure: Some(message.to_string()),
            ..Self::new(journal, image_source_configuration("unused:tag"))
        }
    }

    pub fn failing_update(
        journal: Journal,
        configuration: SourceConfiguration,
        message: &str,
    ) -> Self {
        Self {
            update_failure: Some(message.to_string()),
            ..Self::new(journal, configuration)
        }
    }

    pub fn updates(&self) -> Vec<(String, SourceConfiguration)> {
        self.updates.lock().expect("poisoned mutex").clone()
    }
}

impl DeploymentService for FakeDeployments {
    fn describe_source_configuration(
        &self,
        _service_arn: &str,
    ) -> Result<SourceConfiguration, String> {
        self.journal
            .lock()
            .expect("poisoned mutex")
            .push("describe_service".to_string());
        match &self.describe_failure {
            Some(message) => Err(message.clone()),
            None => Ok(self.configuration.clone()),
        }
    }

    fn update_source_configuration(
        &self,
        service_arn: &str,
        configuration: SourceConfiguration,
    ) -> Result<(), String> {
        self.journal
            .lock()
            .expect("poisoned mutex")
            .push("update_service".to_string());
        if let Some(message) = &self.update_failure {
            return Err(message.clone());
        }
        self.updates
            .lock()
            .expect("poisoned mutex")
            .push((service_arn.to_string(), configuration));
        Ok(())
    }
}

pub const SERVICE_ARN: &str =
    "arn:aws:apprunner:ap-southeast-1:123456789:service/MagentoOnAWS/0123456789abcdef";
pub const IMAGE_REPO: &str = "123456789.dkr.ecr.ap-southeast-1.amazonaws.com/web";

pub fn image_source_configuration(image_identifier: &str) -> SourceConfiguration {
    SourceConfiguration::builder()
        .auto_deployments_enabled(false)
        .authentication_configuration(
            AuthenticationConfiguration::builder()
                .access_role_arn("arn:aws:iam::123456789:role/service-role/AppRunnerECRAccessRole")
                .build(),
        )
        .image_repository(
            ImageRepository::builder()
                .image_identifier(image_identifier)
                .image_repository_type(ImageRepositoryType::Ecr)
                .image_configuration(
                    ImageConfiguration::builder()
                        .port("80")
                        .start_command("apache2-foreground")
                        .runtime_environment_variables("DB_HOST", "db.example.internal")
                        .runtime_environment_variables("BASE_URL", "https://example.com/")
                        .build(),
                )
                .build()
                .expect("image repository should build"),
        )
        .build()
}

/// A Lambda task root with a bundled `src/` tree plus a scratch directory.
pub struct TaskRoot {
    pub root: TempDir,
    pub scratch: TempDir,
}

impl TaskRoot {
    pub fn with_source(files: &[(&str, &str)]) -> Self {
        let root = TempDir::new().expect("task root");
        let scratch = TempDir::new().expect("scratch dir");
        for (relative, contents) in files {
            let path = root.path().join("src").join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("source parent");
            }
            fs::write(path, contents).expect("source file");
        }
        Self { root, scratch }
    }

    pub fn without_source() -> Self {
        Self {
            root: TempDir::new().expect("task root"),
            scratch: TempDir::new().expect("scratch dir"),
        }
    }

    pub fn bundle(&self) -> SourceBundleConfig {
        SourceBundleConfig {
            task_root: self.root.path().to_path_buf(),
            scratch_dir: self.scratch.path().to_path_buf(),
        }
    }

    pub fn scratch_is_empty(&self) -> bool {
        fs::read_dir(self.scratch.path())
            .expect("scratch dir readable")
            .next()
            .is_none()
    }
}

pub fn archive_files(archive: &[u8]) -> BTreeMap<String, String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(archive)).expect("upload should be a valid zip");
    let mut files = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("entry should be readable");
        if entry.is_dir() {
            continue;
        }
        let mut contents = String::new();
        entry
            .read_to_string(&mut contents)
            .expect("entry should be utf-8");
        files.insert(entry.name().to_string(), contents);
    }
    files
}
