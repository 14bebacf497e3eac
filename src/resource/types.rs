//! Record shapes. Every field defaults so partial bodies deserialize.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub organization: String,
    pub client_ip: String,
    pub user: String,
    pub method: String,
    pub request_uri: String,
    pub action: String,
    pub object: String,
    pub response: String,
    pub is_triggered: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub endpoint: String,
    pub port: i32,
    pub username: String,
    pub password: String,
    pub os: String,
    pub tag: String,
    pub is_active: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Provider {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub client_id: String,
    pub client_secret: String,
    pub region: String,
    pub provider_url: String,
    pub state: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Machine {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub provider: String,
    pub zone: String,
    pub category: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub size: String,
    pub tag: String,
    pub state: String,
    pub public_ip: String,
    pub private_ip: String,
    pub os: String,
}

/// Connection session to an asset.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub protocol: String,
    pub ip_address: String,
    pub asset: String,
    pub user: String,
    pub status: String,
    pub connected_time: String,
    pub disconnected_time: String,
}

/// Medical case record.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Case {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub diagnosis_date: String,
    pub prescription: String,
    pub follow_up: String,
    pub hospital_name: String,
    pub doctor_name: String,
    pub patient_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Consultation {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub patient_name: String,
    pub doctor_names: Vec<String>,
    pub expired_time: String,
    pub state: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Doctor {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub department: String,
    pub gender: String,
    pub access_level: String,
    pub hospital_name: String,
}

/// Federated learning job spanning several hospitals.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FederalLearning {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub hospitals: Vec<String>,
    pub model: String,
    pub epochs: i32,
    pub state: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Hospital {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub address: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub owner: String,
    pub name: String,
    pub created_time: String,
    pub display_name: String,
    pub gender: String,
    pub address: String,
    pub email: String,
    pub blood_type: String,
    pub allergies: String,
    pub hospital_name: String,
    pub owners: Vec<String>,
}
