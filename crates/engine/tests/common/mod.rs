#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::Database;

use engine::{
    BcryptHasher, Engine, GatewayError, Mailer, NewUser, Notifier, OutgoingMail, PushMessage,
    User,
};
use migration::MigratorTrait;

/// Notifier keeping every message; optionally failing after recording.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<PushMessage>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn push(&self, message: PushMessage) -> Result<(), GatewayError> {
        self.sent.lock().unwrap().push(message);
        if self.fail {
            return Err(GatewayError::Unreachable("push gateway down".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn mails(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), GatewayError> {
        if self.fail {
            return Err(GatewayError::Rejected {
                status: 503,
                message: "mail gateway down".to_string(),
            });
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub struct Fixture {
    pub engine: Engine,
    pub notifier: Arc<RecordingNotifier>,
    pub mailer: Arc<RecordingMailer>,
}

pub async fn fixture_with(notifier: RecordingNotifier, mailer: RecordingMailer) -> Fixture {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let notifier = Arc::new(notifier);
    let mailer = Arc::new(mailer);
    let engine = Engine::builder()
        .database(db)
        .notifier(notifier.clone())
        .mailer(mailer.clone())
        .hasher(Arc::new(BcryptHasher::with_cost(4)))
        .build()
        .await
        .unwrap();

    Fixture {
        engine,
        notifier,
        mailer,
    }
}

pub async fn fixture() -> Fixture {
    fixture_with(RecordingNotifier::default(), RecordingMailer::default()).await
}

pub async fn register(engine: &Engine, email: &str) -> User {
    engine
        .register(NewUser {
            email: email.to_string(),
            password: "password".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
}
