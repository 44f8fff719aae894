use crate::core::codec;
use crate::domain::model::{Boat, Money};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{MarinaError, Result};
use std::io::Read;

/// 預設容量，沿用舊資料檔的上限
pub const DEFAULT_MAX_BOATS: usize = 120;

/// Outcome of a [`Registry::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
    /// Records remained in the source after the registry filled up.
    pub truncated: bool,
}

/// In-memory boat inventory, kept in insertion order.
#[derive(Debug, Clone)]
pub struct Registry {
    boats: Vec<Boat>,
    max_boats: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BOATS)
    }
}

impl Registry {
    pub fn new(max_boats: usize) -> Self {
        Self {
            boats: Vec::new(),
            max_boats,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.max_boats())
    }

    pub fn len(&self) -> usize {
        self.boats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boats.is_empty()
    }

    pub fn max_boats(&self) -> usize {
        self.max_boats
    }

    pub fn is_full(&self) -> bool {
        self.boats.len() >= self.max_boats
    }

    /// Boats in insertion order.
    pub fn boats(&self) -> &[Boat] {
        &self.boats
    }

    /// First boat whose name matches exactly.
    pub fn find(&self, name: &str) -> Option<&Boat> {
        self.boats.iter().find(|boat| boat.name == name)
    }

    /// Loads records from storage. A missing file leaves the registry untouched.
    pub fn load<S: Storage>(&mut self, storage: &S) -> Result<LoadReport> {
        match storage.read_file()? {
            Some(data) => {
                let report = self.load_from_reader(data.as_slice())?;
                tracing::debug!(
                    "Loaded {} boats from {} ({} skipped)",
                    report.loaded,
                    storage.describe(),
                    report.skipped
                );
                Ok(report)
            }
            None => {
                tracing::info!("{} does not exist, starting with an empty registry", storage.describe());
                Ok(LoadReport::default())
            }
        }
    }

    /// Like [`Registry::load`], but a storage failure is logged and the registry
    /// starts empty instead.
    pub fn load_or_empty<S: Storage>(&mut self, storage: &S) -> LoadReport {
        match self.load(storage) {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Failed to load {}: {}", storage.describe(), e);
                self.boats.clear();
                LoadReport::default()
            }
        }
    }

    /// Appends every record that decodes; bad records are skipped, not fatal.
    pub fn load_from_reader<R: Read>(&mut self, source: R) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        let mut reader = codec::reader(source);

        for result in reader.records() {
            if self.is_full() {
                tracing::warn!("Registry full at {} boats, ignoring remaining records", self.max_boats);
                report.truncated = true;
                break;
            }

            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable record: {}", e);
                    report.skipped += 1;
                    continue;
                }
            };

            match codec::decode_record(&record) {
                Ok(boat) => {
                    self.boats.push(boat);
                    report.loaded += 1;
                }
                Err(e) => {
                    let line = record.position().map(|p| p.line()).unwrap_or_default();
                    tracing::warn!("Skipping record on line {}: {}", line, e);
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    /// Writes every boat in insertion order and returns how many were written.
    pub fn save<S: Storage>(&self, storage: &S) -> Result<usize> {
        let data = self.encode()?;
        storage.write_file(&data)?;
        tracing::debug!("Saved {} boats to {}", self.boats.len(), storage.describe());
        Ok(self.boats.len())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        codec::write_boats(&mut data, &self.boats)?;
        Ok(data)
    }

    /// Boats ordered by name (byte-wise, case-sensitive). Equal names keep insertion order.
    pub fn list_sorted(&self) -> Vec<&Boat> {
        let mut sorted: Vec<&Boat> = self.boats.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    pub fn insert(&mut self, boat: Boat) -> Result<()> {
        if self.is_full() {
            return Err(MarinaError::CapacityExceeded {
                max: self.max_boats,
            });
        }
        tracing::debug!("Adding boat '{}'", boat.name);
        self.boats.push(boat);
        Ok(())
    }

    /// Decodes `line` and appends the boat. Capacity is checked before decoding.
    pub fn add(&mut self, line: &str) -> Result<&Boat> {
        if self.is_full() {
            return Err(MarinaError::CapacityExceeded {
                max: self.max_boats,
            });
        }
        let boat = codec::decode(line)?;
        self.insert(boat)?;
        Ok(&self.boats[self.boats.len() - 1])
    }

    /// Removes the first boat named `name`; later boats keep their relative order.
    pub fn remove(&mut self, name: &str) -> Result<Boat> {
        let index = self.position(name)?;
        let boat = self.boats.remove(index);
        tracing::debug!("Removed boat '{}'", boat.name);
        Ok(boat)
    }

    /// Returns the new balance. Overpayment clamps the balance to zero.
    pub fn apply_payment(&mut self, name: &str, amount: Money) -> Result<Money> {
        let index = self.position(name)?;
        let boat = &mut self.boats[index];
        boat.amount_owed = boat.amount_owed.saturating_sub(amount);
        tracing::debug!(
            "Payment of {} applied to '{}', balance now {}",
            amount,
            boat.name,
            boat.amount_owed
        );
        Ok(boat.amount_owed)
    }

    /// Charges every boat `length * rate(kind)` and returns the total charged.
    pub fn apply_monthly_charge(&mut self) -> Money {
        self.boats.iter_mut().fold(Money::ZERO, |total, boat| {
            let charge = boat.monthly_charge();
            boat.amount_owed = boat.amount_owed.saturating_add(charge);
            total.saturating_add(charge)
        })
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.boats
            .iter()
            .position(|boat| boat.name == name)
            .ok_or_else(|| MarinaError::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Location, LocationKind};
    use crate::utils::error::DecodeError;
    use std::cell::RefCell;

    struct MockStorage {
        file: RefCell<Option<Vec<u8>>>,
        fail_reads: bool,
    }

    impl MockStorage {
        fn new(content: Option<&str>) -> Self {
            Self {
                file: RefCell::new(content.map(|c| c.as_bytes().to_vec())),
                fail_reads: false,
            }
        }

        fn unreadable() -> Self {
            Self {
                fail_reads: true,
                ..Self::new(None)
            }
        }

        fn content(&self) -> Option<String> {
            self.file
                .borrow()
                .as_ref()
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self) -> Result<Option<Vec<u8>>> {
            if self.fail_reads {
                return Err(MarinaError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "no read access",
                )));
            }
            Ok(self.file.borrow().clone())
        }

        fn write_file(&self, data: &[u8]) -> Result<()> {
            *self.file.borrow_mut() = Some(data.to_vec());
            Ok(())
        }

        fn describe(&self) -> String {
            "mock storage".to_string()
        }
    }

    fn registry_with(lines: &[&str]) -> Registry {
        let mut registry = Registry::default();
        for line in lines {
            registry.add(line).unwrap();
        }
        registry
    }

    fn names(boats: &[&Boat]) -> Vec<String> {
        boats.iter().map(|b| b.name.clone()).collect()
    }

    #[test]
    fn test_load_missing_file_gives_empty_registry() {
        let storage = MockStorage::new(None);
        let mut registry = Registry::default();
        let report = registry.load(&storage).unwrap();
        assert_eq!(report, LoadReport::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_skips_bad_records() {
        let storage = MockStorage::new(Some(
            "Good,10,slip,1,0.00\nBad,10,boat,1,0.00\nShort,10\nAlso Good,12,land,A,5.00\n",
        ));
        let mut registry = Registry::default();
        let report = registry.load(&storage).unwrap();
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 2);
        assert!(!report.truncated);
        assert_eq!(registry.boats()[1].name, "Also Good");
    }

    #[test]
    fn test_unreadable_storage_starts_empty() {
        let storage = MockStorage::unreadable();
        let mut registry = Registry::default();
        registry.add("Stale,10,slip,1,0.00").unwrap();

        assert!(matches!(registry.clone().load(&storage), Err(MarinaError::IoError(_))));

        let report = registry.load_or_empty(&storage);
        assert_eq!(report, LoadReport::default());
        assert!(registry.is_empty());

        registry.add("Fresh,12,land,A,1.00").unwrap();
        assert_eq!(registry.save(&storage).unwrap(), 1);
        assert_eq!(storage.content().as_deref(), Some("Fresh,12,land,A,1.00\n"));
    }

    #[test]
    fn test_load_or_empty_passes_through_good_loads() {
        let storage = MockStorage::new(Some("A,10,slip,1,0.00\nbad\n"));
        let mut registry = Registry::default();
        let report = registry.load_or_empty(&storage);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_rejects_line_break_in_name() {
        let mut registry = registry_with(&["Keep,10,slip,1,0.00"]);
        let err = registry.add("Fo\ro,10,slip,1,0.00").unwrap_err();
        assert!(matches!(err, MarinaError::Decode(DecodeError::Malformed { .. })));
        assert_eq!(registry.len(), 1);

        // 存檔再讀回後內容一致
        let storage = MockStorage::new(None);
        registry.save(&storage).unwrap();
        let mut reloaded = Registry::default();
        let report = reloaded.load(&storage).unwrap();
        assert_eq!(report.skipped, 0);
        assert_eq!(reloaded.boats(), registry.boats());
    }

    #[test]
    fn test_load_stops_at_capacity() {
        let mut registry = Registry::new(2);
        let report = registry
            .load_from_reader("A,1,slip,1,0.00\nB,1,slip,2,0.00\nC,1,slip,3,0.00\n".as_bytes())
            .unwrap();
        assert_eq!(report.loaded, 2);
        assert!(report.truncated);
        assert_eq!(registry.len(), 2);
        assert!(registry.find("C").is_none());
    }

    #[test]
    fn test_save_writes_insertion_order() {
        let registry = registry_with(&["Zed,10,slip,1,0.00", "Amy,12,storage,4,1.50"]);
        let storage = MockStorage::new(None);
        assert_eq!(registry.save(&storage).unwrap(), 2);
        assert_eq!(
            storage.content().unwrap(),
            "Zed,10,slip,1,0.00\nAmy,12,storage,4,1.50\n"
        );
    }

    #[test]
    fn test_list_sorted_is_stable_and_case_sensitive() {
        let mut registry = Registry::default();
        registry.insert(Boat::new("beta", 10, Location::Slip(1), Money::ZERO)).unwrap();
        registry.insert(Boat::new("Alpha", 10, Location::Slip(2), Money::ZERO)).unwrap();
        registry.insert(Boat::new("Beta", 10, Location::Slip(3), Money::ZERO)).unwrap();
        registry.insert(Boat::new("Alpha", 10, Location::Slip(4), Money::ZERO)).unwrap();

        let sorted = registry.list_sorted();
        assert_eq!(names(&sorted), vec!["Alpha", "Alpha", "Beta", "beta"]);
        assert_eq!(sorted[0].location, Location::Slip(2));
        assert_eq!(sorted[1].location, Location::Slip(4));
        // insertion order is untouched
        assert_eq!(registry.boats()[0].name, "beta");
    }

    #[test]
    fn test_add_scenario() {
        let mut registry = Registry::default();
        registry.add("Passion,22,slip,23,300.00").unwrap();
        let sorted = registry.list_sorted();
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].length, 22);
        assert_eq!(sorted[0].kind(), LocationKind::Slip);
        assert_eq!(sorted[0].location, Location::Slip(23));
        assert_eq!(sorted[0].amount_owed.to_string(), "300.00");
    }

    #[test]
    fn test_add_unknown_kind_leaves_registry_unchanged() {
        let mut registry = registry_with(&["A,10,slip,1,0.00"]);
        let err = registry.add("X,10,boat,1,0.00").unwrap_err();
        assert!(matches!(err, MarinaError::Decode(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_rejects_when_full() {
        let mut registry = Registry::new(1);
        registry.add("A,10,slip,1,0.00").unwrap();
        let err = registry.add("B,10,slip,2,0.00").unwrap_err();
        assert!(matches!(err, MarinaError::CapacityExceeded { max: 1 }));
        // capacity wins over a bad record
        assert!(matches!(
            registry.add("garbage").unwrap_err(),
            MarinaError::CapacityExceeded { .. }
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_names_act_on_first_match() {
        let mut registry = registry_with(&[
            "Twin,10,slip,1,100.00",
            "Other,10,slip,2,0.00",
            "Twin,20,land,B,50.00",
        ]);
        registry.apply_payment("Twin", Money::from_dollars(40)).unwrap();
        assert_eq!(registry.boats()[0].amount_owed, Money::from_dollars(60));
        assert_eq!(registry.boats()[2].amount_owed, Money::from_dollars(50));

        let removed = registry.remove("Twin").unwrap();
        assert_eq!(removed.length, 10);
        assert_eq!(names(&registry.boats().iter().collect::<Vec<_>>()), vec!["Other", "Twin"]);
    }

    #[test]
    fn test_remove_missing_name_is_not_found() {
        let mut registry = registry_with(&["A,10,slip,1,0.00", "B,11,slip,2,0.00"]);
        let before = registry.boats().to_vec();
        let err = registry.remove("a").unwrap_err();
        assert!(matches!(err, MarinaError::NotFound { ref name } if name == "a"));
        assert_eq!(registry.boats(), before.as_slice());
    }

    #[test]
    fn test_remove_shifts_later_boats() {
        let mut registry = registry_with(&[
            "A,10,slip,1,0.00",
            "B,10,slip,2,0.00",
            "C,10,slip,3,0.00",
        ]);
        registry.remove("B").unwrap();
        let order: Vec<&str> = registry.boats().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(order, vec!["A", "C"]);
    }

    #[test]
    fn test_overpayment_clamps_to_zero() {
        let mut registry = registry_with(&["Jubilee,38,trailor,EX28P,600.00"]);
        let balance = registry.apply_payment("Jubilee", Money::from_dollars(1000)).unwrap();
        assert_eq!(balance, Money::ZERO);
        assert_eq!(registry.find("Jubilee").unwrap().amount_owed.to_string(), "0.00");
    }

    #[test]
    fn test_partial_payment_and_missing_boat() {
        let mut registry = registry_with(&["Jubilee,38,trailor,EX28P,600.00"]);
        let balance = registry.apply_payment("Jubilee", Money::from_cents(10050)).unwrap();
        assert_eq!(balance.to_string(), "499.50");
        assert!(matches!(
            registry.apply_payment("jubilee", Money::from_dollars(1)),
            Err(MarinaError::NotFound { .. })
        ));
    }

    #[test]
    fn test_monthly_charge_scenario() {
        let mut registry = registry_with(&["Anna,20,land,C,0.00"]);
        let total = registry.apply_monthly_charge();
        assert_eq!(total, Money::from_dollars(240));
        assert_eq!(registry.find("Anna").unwrap().amount_owed, Money::from_dollars(240));
    }

    #[test]
    fn test_monthly_charge_is_additive() {
        let lines = [
            "S,10,slip,1,1.25",
            "L,20,land,A,0.00",
            "T,30,trailor,TAG,99.99",
            "G,40,storage,9,10.00",
        ];
        let mut twice = registry_with(&lines);
        twice.apply_monthly_charge();
        twice.apply_monthly_charge();

        let once = registry_with(&lines);
        for (before, after) in once.boats().iter().zip(twice.boats()) {
            let double_rate = before.kind().monthly_rate().cents() * 2;
            let expected = before.amount_owed.cents() + u64::from(before.length) * double_rate;
            assert_eq!(after.amount_owed.cents(), expected);
        }
    }

    #[test]
    fn test_monthly_charge_on_empty_registry() {
        let mut registry = Registry::default();
        assert_eq!(registry.apply_monthly_charge(), Money::ZERO);
    }
}
