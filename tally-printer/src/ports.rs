//! Serial port enumeration
//!
//! Produces a fresh snapshot of the system's serial ports on every call;
//! nothing is cached because USB printers come and go between calls.

use serde::Serialize;
use tokio_serial::SerialPortType;

use crate::error::{PrintError, PrintResult};

/// A serial port as presented to the operator
///
/// USB-serial adapters contribute their descriptor strings; plain
/// platform ports only carry a path.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialPortDescriptor {
    /// Device path, e.g. "/dev/ttyUSB0" or "COM3"
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// USB vendor ID as 4-digit lowercase hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// USB product ID as 4-digit lowercase hex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Human-readable label for port pickers
    pub display_name: String,
}

/// List the serial ports currently present on the system
pub fn list_serial_ports() -> PrintResult<Vec<SerialPortDescriptor>> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| PrintError::OpenFailed(format!("Port enumeration failed: {}", e)))?;

    Ok(ports.into_iter().map(describe).collect())
}

fn describe(info: tokio_serial::SerialPortInfo) -> SerialPortDescriptor {
    match info.port_type {
        SerialPortType::UsbPort(usb) => {
            let display_name = usb
                .product
                .clone()
                .unwrap_or_else(|| info.port_name.clone());
            SerialPortDescriptor {
                path: info.port_name,
                manufacturer: usb.manufacturer,
                serial_number: usb.serial_number,
                vendor_id: Some(format!("{:04x}", usb.vid)),
                product_id: Some(format!("{:04x}", usb.pid)),
                display_name,
            }
        }
        _ => SerialPortDescriptor {
            path: info.port_name.clone(),
            manufacturer: None,
            serial_number: None,
            vendor_id: None,
            product_id: None,
            display_name: info.port_name,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_serial_ports_does_not_fail() {
        // The set of ports depends on the host; the call itself must succeed
        // (possibly with an empty list) on any supported platform.
        let ports = list_serial_ports().unwrap();
        for port in &ports {
            assert!(!port.path.is_empty());
            assert!(!port.display_name.is_empty());
        }
    }

    #[test]
    fn test_usb_port_description() {
        let info = tokio_serial::SerialPortInfo {
            port_name: "/dev/ttyUSB0".to_string(),
            port_type: SerialPortType::UsbPort(tokio_serial::UsbPortInfo {
                vid: 0x0483,
                pid: 0x5740,
                serial_number: Some("A1B2C3".to_string()),
                manufacturer: Some("Epson".to_string()),
                product: Some("TM-T20III".to_string()),
            }),
        };

        let desc = describe(info);
        assert_eq!(desc.path, "/dev/ttyUSB0");
        assert_eq!(desc.vendor_id.as_deref(), Some("0483"));
        assert_eq!(desc.product_id.as_deref(), Some("5740"));
        assert_eq!(desc.display_name, "TM-T20III");
    }

    #[test]
    fn test_plain_port_falls_back_to_path() {
        let info = tokio_serial::SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::Unknown,
        };

        let desc = describe(info);
        assert_eq!(desc.display_name, "/dev/ttyS0");
        assert!(desc.vendor_id.is_none());
    }
}
