//! Column ordering: a closed set of sortable fields, a comparator builder and
//! a stable sort that does not rely on the stability of the underlying
//! primitive.

use crate::record::Record;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Arrow shown next to the active column header.
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields a record can be ordered by. `details` is deliberately absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Location,
    CurrentTemperature,
    CurrentHumidity,
    Status,
}

/// A borrowed, typed view of one field of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::Name,
        SortField::Location,
        SortField::CurrentTemperature,
        SortField::CurrentHumidity,
        SortField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Id => "Detail",
            SortField::Name => "Device Name",
            SortField::Location => "Location",
            SortField::CurrentTemperature => "Temperature",
            SortField::CurrentHumidity => "Humidity",
            SortField::Status => "Status",
        }
    }

    /// Field name as it appears on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Location => "location",
            SortField::CurrentTemperature => "currentTemperature",
            SortField::CurrentHumidity => "currentHumidity",
            SortField::Status => "status",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Column index used for the number-key shortcuts (1-based in the UI).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn value<'a>(&self, record: &'a Record) -> FieldValue<'a> {
        match self {
            SortField::Id => FieldValue::Int(record.id),
            SortField::Name => FieldValue::Text(&record.name),
            SortField::Location => FieldValue::Text(&record.location),
            SortField::CurrentTemperature => FieldValue::Float(record.current_temperature),
            SortField::CurrentHumidity => FieldValue::Float(record.current_humidity),
            SortField::Status => FieldValue::Text(record.status.as_str()),
        }
    }
}

/// The single active sort key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub order_by: SortField,
    pub order: SortDirection,
}

impl SortState {
    pub fn new(order_by: SortField, order: SortDirection) -> Self {
        Self { order_by, order }
    }

    /// Clicking the active ascending column flips it to descending; anything
    /// else starts ascending on the requested column.
    pub fn request(self, field: SortField) -> Self {
        let is_asc = self.order_by == field && self.order == SortDirection::Asc;
        Self {
            order_by: field,
            order: if is_asc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        }
    }
}

fn descending<'a>(a: FieldValue<'a>, b: FieldValue<'a>) -> Ordering {
    let (greater, less) = match (a, b) {
        (FieldValue::Int(a), FieldValue::Int(b)) => (a > b, a < b),
        (FieldValue::Float(a), FieldValue::Float(b)) => (a > b, a < b),
        (FieldValue::Text(a), FieldValue::Text(b)) => (a > b, a < b),
        // A SortField always yields the same variant for both sides.
        _ => (false, false),
    };
    if greater {
        Ordering::Less
    } else if less {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Build a total-order comparator for `field`. Ascending is the exact
/// reverse of descending.
pub fn comparator(
    direction: SortDirection,
    field: SortField,
) -> impl Fn(&Record, &Record) -> Ordering + Copy {
    move |a: &Record, b: &Record| {
        let desc = descending(field.value(a), field.value(b));
        match direction {
            SortDirection::Desc => desc,
            SortDirection::Asc => desc.reverse(),
        }
    }
}

/// Sort into a new vector. Elements the comparator considers equal keep
/// their input order.
pub fn stable_sort<T, F>(items: &[T], cmp: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let mut decorated: Vec<(usize, &T)> = items.iter().enumerate().collect();
    decorated.sort_unstable_by(|(ia, a), (ib, b)| cmp(*a, *b).then_with(|| ia.cmp(ib)));
    decorated.into_iter().map(|(_, item)| item.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DeviceStatus, Details};

    fn rec(id: i64, name: &str, temp: f64, status: DeviceStatus) -> Record {
        Record {
            id,
            name: name.to_string(),
            location: format!("loc-{}", id % 3),
            current_temperature: temp,
            current_humidity: 50.0 - temp,
            open: false,
            status,
            details: Details {
                name: String::new(),
                temperature_data_points: vec![],
                humidity_data_points: vec![],
            },
        }
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_duplicate_ids_keep_input_order() {
        let records = vec![
            rec(1, "A", 0.0, DeviceStatus::Healthy),
            rec(2, "B", 0.0, DeviceStatus::Healthy),
            rec(1, "A2", 0.0, DeviceStatus::Healthy),
        ];
        let sorted = stable_sort(&records, comparator(SortDirection::Asc, SortField::Id));
        assert_eq!(names(&sorted), vec!["A", "A2", "B"]);

        let sorted = stable_sort(&records, comparator(SortDirection::Desc, SortField::Id));
        assert_eq!(names(&sorted), vec!["B", "A", "A2"]);
    }

    #[test]
    fn test_stable_for_every_field_and_direction() {
        let records: Vec<Record> = (0..30)
            .map(|i| {
                rec(
                    i,
                    &format!("dev-{:02}", i),
                    (i % 4) as f64,
                    if i % 2 == 0 {
                        DeviceStatus::Error
                    } else {
                        DeviceStatus::Connected
                    },
                )
            })
            .collect();

        for field in SortField::ALL {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let cmp = comparator(direction, field);
                let sorted = stable_sort(&records, cmp);
                for pair in sorted.windows(2) {
                    assert_ne!(cmp(&pair[0], &pair[1]), Ordering::Greater);
                    if cmp(&pair[0], &pair[1]) == Ordering::Equal {
                        // ids were assigned in input order
                        assert!(pair[0].id < pair[1].id, "{:?} {:?}", field, direction);
                    }
                }
            }
        }
    }

    #[test]
    fn test_mirror_property() {
        let records = vec![
            rec(3, "gamma", 21.5, DeviceStatus::Healthy),
            rec(1, "alpha", -4.0, DeviceStatus::Error),
            rec(2, "beta", 21.5, DeviceStatus::Connected),
            rec(2, "Beta", 30.0, DeviceStatus::Disconnected),
        ];
        for field in SortField::ALL {
            let asc = comparator(SortDirection::Asc, field);
            let desc = comparator(SortDirection::Desc, field);
            for a in &records {
                for b in &records {
                    assert_eq!(desc(a, b), asc(a, b).reverse());
                }
            }
        }
    }

    #[test]
    fn test_numeric_and_text_ordering() {
        let records = vec![
            rec(1, "b", 10.0, DeviceStatus::Healthy),
            rec(2, "a", 9.5, DeviceStatus::Error),
            rec(3, "c", 100.0, DeviceStatus::Connected),
        ];
        let by_temp = stable_sort(
            &records,
            comparator(SortDirection::Asc, SortField::CurrentTemperature),
        );
        assert_eq!(names(&by_temp), vec!["a", "b", "c"]);

        let by_name = stable_sort(&records, comparator(SortDirection::Desc, SortField::Name));
        assert_eq!(names(&by_name), vec!["c", "b", "a"]);

        let by_status = stable_sort(&records, comparator(SortDirection::Asc, SortField::Status));
        assert_eq!(names(&by_status), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_input_untouched() {
        let records = vec![
            rec(2, "b", 0.0, DeviceStatus::Healthy),
            rec(1, "a", 0.0, DeviceStatus::Healthy),
        ];
        let _ = stable_sort(&records, comparator(SortDirection::Asc, SortField::Id));
        assert_eq!(names(&records), vec!["b", "a"]);
    }

    #[test]
    fn test_request_sort() {
        let state = SortState::default();
        assert_eq!(state, SortState::new(SortField::Id, SortDirection::Asc));

        let state = state.request(SortField::Id);
        assert_eq!(state.order, SortDirection::Desc);

        let state = state.request(SortField::Id);
        assert_eq!(state.order, SortDirection::Asc);

        let state = state
            .request(SortField::Id)
            .request(SortField::CurrentHumidity);
        assert_eq!(
            state,
            SortState::new(SortField::CurrentHumidity, SortDirection::Asc)
        );
    }

    #[test]
    fn test_field_keys() {
        for field in SortField::ALL {
            assert_eq!(SortField::from_key(field.key()), Some(field));
        }
        assert_eq!(SortField::from_key("details"), None);
        assert_eq!(SortField::from_index(5), Some(SortField::Status));
        assert_eq!(SortField::from_index(6), None);
    }
}
