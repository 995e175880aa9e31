use crate::alarm::{alarm_label, NOT_AVAILABLE};
use crate::models::{DeviceRecord, OnuKey, StatusClass};

/// One selectable result card: the key it selects plus the rendered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct OnuCard {
    pub key: OnuKey,
    pub status: StatusClass,
    pub title: String,
    pub fields: Vec<CardField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardField {
    pub label: &'static str,
    pub value: String,
}

impl CardField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

impl OnuCard {
    pub fn from_record(record: &DeviceRecord) -> Self {
        let rx_power = record
            .rx_power
            .as_ref()
            .map(|rx| rx.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        // Fixed order: FSP, ONU ID, status, RX power, last down, SN
        let fields = vec![
            CardField::new("FSP", record.fsp.as_str()),
            CardField::new("ONU ID", record.ont_id.as_str()),
            CardField::new("Status", or_not_available(record.run_state.as_deref())),
            CardField::new("RX Power", rx_power),
            CardField::new("Last Down", alarm_label(record.alarm.as_deref())),
            CardField::new("SN", or_not_available(record.sn.as_deref())),
        ];

        Self {
            key: record.key(),
            status: StatusClass::from_run_state(record.run_state.as_deref()),
            title: record.description.clone(),
            fields,
        }
    }

    #[cfg(test)]
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}

fn or_not_available(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}
