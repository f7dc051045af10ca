use std::sync::Arc;

use crate::Durability;
use crate::Error;
use crate::KvEngine;
use crate::WriteBatch;

/// Test suite for KvEngine implementations
///
/// Implement `KvEngineBuilder` for a new engine and call
/// `KvEngineTestSuite::run_all_tests` with it.
pub struct KvEngineTestSuite;

/// Builder trait for creating KvEngine instances for testing
pub trait KvEngineBuilder {
    type Engine: KvEngine;

    /// Create a fresh, empty engine
    fn build(&self) -> Result<Arc<Self::Engine>, Error>;

    /// Clean up any resources after testing
    fn cleanup(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl KvEngineTestSuite {
    pub fn run_all_tests<B: KvEngineBuilder>(builder: B) -> Result<(), Error> {
        Self::test_empty_engine(builder.build()?)?;
        Self::test_put_get_overwrite(builder.build()?)?;
        Self::test_empty_value_is_not_missing(builder.build()?)?;
        Self::test_batch_is_applied_in_order(builder.build()?)?;
        Self::test_delete_range_is_half_open(builder.build()?)?;
        Self::test_bounded_scans_ignore_neighbours(builder.build()?)?;
        Self::test_relaxed_writes_visible_and_flushable(builder.build()?)?;

        builder.cleanup()?;
        Ok(())
    }

    fn test_empty_engine<E: KvEngine>(engine: Arc<E>) -> Result<(), Error> {
        assert_eq!(engine.get(b"missing")?, None);
        assert_eq!(engine.first_key_in(&[0x00], &[0xff])?, None);
        assert_eq!(engine.last_key_in(&[0x00], &[0xff])?, None);
        engine.flush()?;
        Ok(())
    }

    fn test_put_get_overwrite<E: KvEngine>(engine: Arc<E>) -> Result<(), Error> {
        engine.put(b"k", b"v1", Durability::Sync)?;
        assert_eq!(engine.get(b"k")?, Some(b"v1".to_vec()));

        engine.put(b"k", b"v2", Durability::Sync)?;
        assert_eq!(engine.get(b"k")?, Some(b"v2".to_vec()));
        Ok(())
    }

    fn test_empty_value_is_not_missing<E: KvEngine>(engine: Arc<E>) -> Result<(), Error> {
        engine.put(b"empty", b"", Durability::Sync)?;
        assert_eq!(engine.get(b"empty")?, Some(Vec::new()));
        Ok(())
    }

    fn test_batch_is_applied_in_order<E: KvEngine>(engine: Arc<E>) -> Result<(), Error> {
        engine.put(b"gone", b"x", Durability::Sync)?;

        let mut batch = WriteBatch::with_capacity(4);
        batch.put(b"a".to_vec(), b"1".to_vec());
        batch.put(b"b".to_vec(), b"2".to_vec());
        batch.delete(b"gone".to_vec());
        batch.put(b"a".to_vec(), b"3".to_vec());
        engine.write(batch, Durability::Sync)?;

        assert_eq!(engine.get(b"a")?, Some(b"3".to_vec()));
        assert_eq!(engine.get(b"b")?, Some(b"2".to_vec()));
        assert_eq!(engine.get(b"gone")?, None);
        Ok(())
    }

    fn test_delete_range_is_half_open<E: KvEngine>(engine: Arc<E>) -> Result<(), Error> {
        for k in [b"a", b"b", b"c", b"d"] {
            engine.put(k, k, Durability::Sync)?;
        }

        engine.delete_range(b"b", b"d", Durability::Relaxed)?;

        assert!(engine.get(b"a")?.is_some());
        assert!(engine.get(b"b")?.is_none());
        assert!(engine.get(b"c")?.is_none());
        assert!(engine.get(b"d")?.is_some());
        Ok(())
    }

    fn test_bounded_scans_ignore_neighbours<E: KvEngine>(engine: Arc<E>) -> Result<(), Error> {
        engine.put(&[0x01, 0xff], b"below", Durability::Sync)?;
        engine.put(&[0x02, 0x05], b"in", Durability::Sync)?;
        engine.put(&[0x02, 0x09], b"in", Durability::Sync)?;
        engine.put(&[0x03], b"above", Durability::Sync)?;

        assert_eq!(engine.first_key_in(&[0x02], &[0x03])?, Some(vec![0x02, 0x05]));
        assert_eq!(engine.last_key_in(&[0x02], &[0x03])?, Some(vec![0x02, 0x09]));
        assert_eq!(engine.first_key_in(&[0x04], &[0x05])?, None);
        Ok(())
    }

    fn test_relaxed_writes_visible_and_flushable<E: KvEngine>(engine: Arc<E>) -> Result<(), Error> {
        engine.put(b"relaxed", b"1", Durability::Relaxed)?;
        assert_eq!(engine.get(b"relaxed")?, Some(b"1".to_vec()));

        engine.flush()?;
        assert_eq!(engine.get(b"relaxed")?, Some(b"1".to_vec()));
        Ok(())
    }
}
