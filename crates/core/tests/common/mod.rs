//! In-memory backend for view tests.
//!
//! `MockApi` implements both API traits, serves scripted responses, and
//! records every call so tests can assert what was (or was not) sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use expo_admin_core::allowlist::{AllowlistReply, NewAdmin, TelegramAdmin};
use expo_admin_core::api::{AdminAllowlistApi, ApiError, ResourceApi};
use expo_admin_core::payload::Payload;
use expo_admin_core::record::Record;
use expo_admin_core::resource::ResourceDescriptor;
use expo_admin_core::session::{Session, Token};
use expo_admin_core::types::DbId;

pub const TOKEN: &str = "test-token";

pub fn session() -> Session {
    Session::new(Some(TOKEN.to_string()))
}

/// Build a record from a JSON object literal.
pub fn record(value: Value) -> Record {
    serde_json::from_value(value).expect("test record must be an object")
}

pub fn records(value: Value) -> Vec<Record> {
    serde_json::from_value(value).expect("test records must be an array of objects")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(&'static str),
    Get(&'static str, DbId),
    Create(&'static str, Payload),
    Update(&'static str, DbId, Payload),
    Remove(&'static str, DbId),
    Reference(&'static str),
    ListAdmins,
    AddAdmin(NewAdmin),
    RemoveAdmin(String),
}

#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    lists: Mutex<HashMap<&'static str, Result<Vec<Record>, ApiError>>>,
    details: Mutex<HashMap<(&'static str, DbId), Result<Record, ApiError>>>,
    write_error: Mutex<Option<ApiError>>,
    admins: Mutex<Vec<TelegramAdmin>>,
    admin_error: Mutex<Option<ApiError>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows served by both the authenticated and the anonymous list call.
    pub fn with_list(self, endpoint: &'static str, rows: Vec<Record>) -> Self {
        self.lists.lock().unwrap().insert(endpoint, Ok(rows));
        self
    }

    pub fn with_list_error(self, endpoint: &'static str, error: ApiError) -> Self {
        self.lists.lock().unwrap().insert(endpoint, Err(error));
        self
    }

    pub fn with_record(self, endpoint: &'static str, id: DbId, record: Record) -> Self {
        self.details.lock().unwrap().insert((endpoint, id), Ok(record));
        self
    }

    pub fn with_record_error(self, endpoint: &'static str, id: DbId, error: ApiError) -> Self {
        self.details.lock().unwrap().insert((endpoint, id), Err(error));
        self
    }

    /// Make every create, update and delete fail.
    pub fn failing_writes(self, error: ApiError) -> Self {
        *self.write_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_admins(self, admins: Vec<TelegramAdmin>) -> Self {
        *self.admins.lock().unwrap() = admins;
        self
    }

    pub fn failing_admin_calls(self, error: ApiError) -> Self {
        *self.admin_error.lock().unwrap() = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_result(&self) -> Result<(), ApiError> {
        match self.write_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn admin_result(&self) -> Result<(), ApiError> {
        match self.admin_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn rows(&self, endpoint: &'static str) -> Result<Vec<Record>, ApiError> {
        self.lists
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn check_token(token: &Token) -> Result<(), ApiError> {
    if token.as_str() == TOKEN {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

#[async_trait]
impl ResourceApi for MockApi {
    async fn list(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
    ) -> Result<Vec<Record>, ApiError> {
        self.record_call(Call::List(resource.endpoint));
        check_token(token)?;
        self.rows(resource.endpoint)
    }

    async fn get(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
    ) -> Result<Record, ApiError> {
        self.record_call(Call::Get(resource.endpoint, id));
        check_token(token)?;
        self.details
            .lock()
            .unwrap()
            .get(&(resource.endpoint, id))
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::Status {
                    status: 404,
                    body: "not found".into(),
                })
            })
    }

    async fn create(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        payload: &Payload,
    ) -> Result<Record, ApiError> {
        self.record_call(Call::Create(resource.endpoint, payload.clone()));
        check_token(token)?;
        self.write_result()?;
        Ok(Record::default())
    }

    async fn update(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
        payload: &Payload,
    ) -> Result<Record, ApiError> {
        self.record_call(Call::Update(resource.endpoint, id, payload.clone()));
        check_token(token)?;
        self.write_result()?;
        Ok(Record::default())
    }

    async fn remove(
        &self,
        token: &Token,
        resource: &ResourceDescriptor,
        id: DbId,
    ) -> Result<(), ApiError> {
        self.record_call(Call::Remove(resource.endpoint, id));
        check_token(token)?;
        self.write_result()
    }

    async fn reference_list(&self, resource: &ResourceDescriptor) -> Result<Vec<Record>, ApiError> {
        self.record_call(Call::Reference(resource.endpoint));
        self.rows(resource.endpoint)
    }
}

#[async_trait]
impl AdminAllowlistApi for MockApi {
    async fn list_admins(&self, token: &Token) -> Result<Vec<TelegramAdmin>, ApiError> {
        self.record_call(Call::ListAdmins);
        check_token(token)?;
        self.admin_result()?;
        Ok(self.admins.lock().unwrap().clone())
    }

    async fn add_admin(&self, token: &Token, admin: &NewAdmin) -> Result<AllowlistReply, ApiError> {
        self.record_call(Call::AddAdmin(admin.clone()));
        check_token(token)?;
        self.admin_result()?;

        let mut admins = self.admins.lock().unwrap();
        if admins.iter().any(|a| a.username == admin.username) {
            return Ok(AllowlistReply {
                success: false,
                error: Some("Admin already exists".into()),
            });
        }
        let id = admins.len() as DbId + 1;
        admins.push(TelegramAdmin {
            id,
            username: admin.username.clone(),
            full_name: Some(admin.full_name.clone()).filter(|n| !n.is_empty()),
            created_at: "2025-01-01T00:00:00.000Z".into(),
        });
        Ok(AllowlistReply {
            success: true,
            error: None,
        })
    }

    async fn remove_admin(
        &self,
        token: &Token,
        username: &str,
    ) -> Result<AllowlistReply, ApiError> {
        self.record_call(Call::RemoveAdmin(username.to_string()));
        check_token(token)?;
        self.admin_result()?;

        let mut admins = self.admins.lock().unwrap();
        let before = admins.len();
        admins.retain(|a| a.username != username);
        Ok(if admins.len() < before {
            AllowlistReply {
                success: true,
                error: None,
            }
        } else {
            AllowlistReply {
                success: false,
                error: Some("Admin not found".into()),
            }
        })
    }
}
