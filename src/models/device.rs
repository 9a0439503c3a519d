//! Devices registered to the account.

use serde::{Deserialize, Serialize};

use super::common::lenient_u64;

/// Kind of a registered device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Android,
    Ios,
    DesktopApp,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One registered device (`sj#devicemanagementinfoentry`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device ID as reported, e.g. `0x0123456789abcdef` for Android.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub friendly_name: String,

    #[serde(rename = "type", default)]
    pub device_type: DeviceType,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub last_accessed_time_ms: Option<u64>,

    #[serde(default)]
    pub smart_phone: bool,
}

impl Device {
    pub fn is_android(&self) -> bool {
        self.device_type == DeviceType::Android
    }
}

/// Snapshot of registered devices (`sj#devicemanagementinfo`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "DeviceManagementInfo")]
pub struct DeviceList {
    devices: Vec<Device>,
}

#[derive(Deserialize)]
struct DeviceManagementInfo {
    #[serde(default)]
    data: DeviceData,
}

#[derive(Default, Deserialize)]
struct DeviceData {
    #[serde(default)]
    items: Vec<Device>,
}

impl From<DeviceManagementInfo> for DeviceList {
    fn from(info: DeviceManagementInfo) -> Self {
        Self {
            devices: info.data.items,
        }
    }
}

impl DeviceList {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// First device tagged as Android that has an ID, in server order.
    pub fn first_android(&self) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.is_android() && !d.id.is_empty())
    }
}
