#![allow(dead_code, clippy::unwrap_used)]

// In-memory controller shared by the builder tests. It answers name
// lookups from a fixed table and records every request it is sent.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use fmcly_core::{
    ControllerVersion, CoreError, Method, ObjectCategory, ObjectReference, ResolvedObject,
    Resolver, Transport,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct FakeController {
    objects: HashMap<(ObjectCategory, String), ResolvedObject>,
    version: Option<ControllerVersion>,
    lookups: Mutex<Vec<(ObjectCategory, String)>>,
    requests: Mutex<Vec<SentRequest>>,
    responses: Mutex<VecDeque<Result<Value, fmcly_api::Error>>>,
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.version = Some(ControllerVersion::new(major, minor, patch));
        self
    }

    pub fn with(mut self, category: ObjectCategory, name: &str, id: &str, kind: &str) -> Self {
        self.objects.insert(
            (category, name.to_owned()),
            ResolvedObject::new(ObjectReference::new(name, id, kind)),
        );
        self
    }

    pub fn with_group(
        mut self,
        category: ObjectCategory,
        name: &str,
        id: &str,
        members: usize,
    ) -> Self {
        self.objects.insert(
            (category, name.to_owned()),
            ResolvedObject::new(ObjectReference::new(name, id, "InterfaceGroup"))
                .with_members(members),
        );
        self
    }

    pub fn respond(&self, response: Value) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn fail(&self, error: fmcly_api::Error) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn lookups(&self) -> Vec<(ObjectCategory, String)> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Resolver for FakeController {
    async fn find_by_name(
        &self,
        category: ObjectCategory,
        name: &str,
    ) -> Result<Option<ResolvedObject>, CoreError> {
        self.lookups
            .lock()
            .unwrap()
            .push((category, name.to_owned()));
        Ok(self.objects.get(&(category, name.to_owned())).cloned())
    }

    fn server_version(&self) -> Option<ControllerVersion> {
        self.version
    }
}

impl Transport for FakeController {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, CoreError> {
        self.requests.lock().unwrap().push(SentRequest {
            method,
            path: path.to_owned(),
            body: body.cloned(),
        });
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) => Err(e.into()),
            None => Ok(Value::Null),
        }
    }
}

/// A controller holding the objects most tests need.
pub fn lab() -> FakeController {
    FakeController::new()
        .with_version(6, 6, 0)
        .with(ObjectCategory::AccessControlPolicy, "Branch ACP", "acp-1", "AccessPolicy")
        .with(ObjectCategory::NatPolicy, "Branch NAT", "nat-1", "FTDNatPolicy")
        .with(ObjectCategory::SecurityZone, "inside", "z-in", "SecurityZone")
        .with(ObjectCategory::SecurityZone, "outside", "z-out", "SecurityZone")
        .with(ObjectCategory::ProtocolPort, "HTTPS", "p-443", "ProtocolPortObject")
        .with(ObjectCategory::PortGroup, "web-ports", "pg-1", "PortObjectGroup")
        .with(ObjectCategory::VlanTag, "vlan100", "v-100", "VlanTag")
        .with(ObjectCategory::Url, "intranet", "u-1", "Url")
        .with(ObjectCategory::UrlGroup, "partners", "ug-1", "UrlGroup")
        .with(ObjectCategory::Application, "HTTP", "a-1", "Application")
        .with(ObjectCategory::Address, "web01", "n-web", "Host")
        .with(ObjectCategory::Address, "lan", "n-lan", "Network")
        .with(ObjectCategory::Address, "srv1", "abc", "Host")
        .with(ObjectCategory::NetworkGroup, "dmz-hosts", "g-dmz", "NetworkGroup")
        .with(ObjectCategory::Fqdn, "updates", "f-1", "FQDN")
        .with(ObjectCategory::Interface, "outside-if", "i-out", "SecurityZone")
        .with(ObjectCategory::IntrusionPolicy, "Balanced", "ips-1", "IntrusionPolicy")
        .with(ObjectCategory::VariableSet, "Default-Set", "vs-1", "VariableSet")
        .with(ObjectCategory::FilePolicy, "Block Malware", "fp-1", "FilePolicy")
}
