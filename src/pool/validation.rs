//! Whole-pool reference validation.
//!
//! Decoding leaves cross references unchecked. [`ConstantPool::validate`] follows every direct
//! reference of every record and reports all that fail, so a caller can reject a broken pool
//! up front instead of meeting the errors one lookup at a time. Records are checked in parallel;
//! the pool is only read.
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{constants::Constant, ConstantPool, Error, Result};

impl ConstantPool {
    /// Parallel counterpart of [`ConstantPool::iter`].
    ///
    /// Collecting the iterator keeps index order.
    pub fn par_iter(&self) -> impl ParallelIterator<Item = (u16, &Constant)> + '_ {
        self.slots
            .par_iter()
            .enumerate()
            .filter_map(|(index, slot)| Some((u16::try_from(index).ok()?, slot.as_ref()?)))
    }

    /// Follows every cross reference of every record.
    ///
    /// ```rust
    /// use classpool::prelude::*;
    ///
    /// let mut pool = ConstantPool::new();
    /// pool.insert(ConstantInteger::new(1))?;
    /// pool.insert(ConstantClass::new(1))?;
    /// pool.insert(ConstantString::new(9))?;
    ///
    /// match pool.validate() {
    ///     Err(Error::Invalid(failures)) => {
    ///         let slots: Vec<u16> = failures.iter().map(|(slot, _)| *slot).collect();
    ///         assert_eq!(slots, [2, 3]);
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// # Ok::<(), classpool::Error>(())
    /// ```
    ///
    /// # Errors
    /// Returns [`Error::Invalid`] listing each referring slot with its resolution error, in
    /// index order.
    pub fn validate(&self) -> Result<()> {
        let failures: Vec<(u16, Error)> = self
            .par_iter()
            .flat_map_iter(|(index, constant)| {
                self.check_references(constant)
                    .into_iter()
                    .map(move |err| (index, err))
            })
            .collect();

        if failures.is_empty() {
            debug!(slots = self.len(), "Constant pool references valid");
            return Ok(());
        }

        for (index, err) in &failures {
            warn!(slot = *index, error = %err, "Broken constant pool reference");
        }
        Err(Error::Invalid(failures))
    }

    /// Resolution errors of the references held directly by `constant`.
    fn check_references(&self, constant: &Constant) -> Vec<Error> {
        let mut failures = Vec::new();
        let mut check = |result: Result<()>| {
            if let Err(err) = result {
                failures.push(err);
            }
        };

        match constant {
            Constant::Utf8(_)
            | Constant::Integer(_)
            | Constant::Float(_)
            | Constant::Long(_)
            | Constant::Double(_) => {}
            Constant::Class(c) => check(c.resolve(self).map(drop)),
            Constant::String(c) => check(c.resolve(self).map(drop)),
            Constant::MethodType(c) => check(c.resolve(self).map(drop)),
            Constant::Module(c) => check(c.resolve(self).map(drop)),
            Constant::Package(c) => check(c.resolve(self).map(drop)),
            Constant::NameAndType(c) => {
                check(c.name(self).map(drop));
                check(c.signature(self).map(drop));
            }
            Constant::Fieldref(c) => {
                check(c.class(self).map(drop));
                check(c.name_and_type(self).map(drop));
            }
            Constant::Methodref(c) => {
                check(c.class(self).map(drop));
                check(c.name_and_type(self).map(drop));
            }
            Constant::InterfaceMethodref(c) => {
                check(c.class(self).map(drop));
                check(c.name_and_type(self).map(drop));
            }
            Constant::MethodHandle(c) => check(c.target(self).map(drop)),
            Constant::Dynamic(c) => check(c.name_and_type(self).map(drop)),
            Constant::InvokeDynamic(c) => check(c.name_and_type(self).map(drop)),
        }

        failures
    }
}
