//! # Pool Builder
//!
//! [`PoolBuilder`] assembles a [`ConstantPool`] from names and literals instead of raw indices.
//! Every method returns the index of an existing equal record when there is one, and otherwise
//! inserts whatever records are missing, dependencies first.
//!
//! ## Usage
//!
//! ```rust
//! use classpool::prelude::*;
//!
//! let mut builder = PoolBuilder::new();
//! let println = builder.methodref("java/io/PrintStream", "println", "(Ljava/lang/String;)V")?;
//! let out = builder.fieldref("java/lang/System", "out", "Ljava/io/PrintStream;")?;
//! let again = builder.methodref("java/io/PrintStream", "println", "(Ljava/lang/String;)V")?;
//! assert_eq!(println, again);
//!
//! let pool = builder.finish();
//! assert_eq!(pool.describe(out)?, "java.lang.System.out Ljava/io/PrintStream;");
//! # Ok::<(), classpool::Error>(())
//! ```
use std::collections::HashMap;

use crate::{
    constants::{
        Constant, ConstantClass, ConstantDouble, ConstantDynamic, ConstantFieldref,
        ConstantFloat, ConstantInteger, ConstantInterfaceMethodref, ConstantInvokeDynamic,
        ConstantLong, ConstantMethodHandle, ConstantMethodType, ConstantMethodref, ConstantModule,
        ConstantNameAndType, ConstantPackage, ConstantString, ConstantTag, ConstantUtf8,
        ReferenceKind,
    },
    ConstantPool, Result,
};

/// Deduplicating, name-based construction of a [`ConstantPool`].
#[derive(Debug, Clone, Default)]
pub struct PoolBuilder {
    pool: ConstantPool,
    /// First index of every record in `pool`
    known: HashMap<Constant, u16>,
}

impl PoolBuilder {
    /// Creates a builder over an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder that extends an existing pool, reusing its records.
    ///
    /// When the pool holds duplicates, the lowest index is reused.
    #[must_use]
    pub fn from_pool(pool: ConstantPool) -> Self {
        let mut known = HashMap::new();
        for (index, constant) in pool.iter() {
            known.entry(constant.clone()).or_insert(index);
        }

        PoolBuilder { pool, known }
    }

    /// The pool built so far.
    #[must_use]
    pub fn pool(&self) -> &ConstantPool {
        &self.pool
    }

    /// Returns the finished pool.
    #[must_use]
    pub fn finish(self) -> ConstantPool {
        self.pool
    }

    /// Returns the index of a record equal to `constant`, inserting it if needed.
    ///
    /// # Errors
    /// Returns [`crate::Error::PoolOverflow`] if the record does not fit.
    pub fn add(&mut self, constant: impl Into<Constant>) -> Result<u16> {
        let constant = constant.into();
        if let Some(&index) = self.known.get(&constant) {
            return Ok(index);
        }

        let index = self.pool.insert(constant.clone())?;
        self.known.insert(constant, index);
        Ok(index)
    }

    /// Adds a `CONSTANT_Utf8`.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedRecord`] for text longer than 65535 encoded bytes, or
    /// [`crate::Error::PoolOverflow`].
    pub fn utf8(&mut self, text: &str) -> Result<u16> {
        self.add(ConstantUtf8::new(text)?)
    }

    /// Adds a `CONSTANT_Integer`.
    ///
    /// # Errors
    /// Returns [`crate::Error::PoolOverflow`] if the pool is full.
    pub fn integer(&mut self, value: i32) -> Result<u16> {
        self.add(ConstantInteger::new(value))
    }

    /// Adds a `CONSTANT_Float`.
    ///
    /// # Errors
    /// Returns [`crate::Error::PoolOverflow`] if the pool is full.
    pub fn float(&mut self, value: f32) -> Result<u16> {
        self.add(ConstantFloat::new(value))
    }

    /// Adds a `CONSTANT_Long`.
    ///
    /// # Errors
    /// Returns [`crate::Error::PoolOverflow`] if the pool is full.
    pub fn long(&mut self, value: i64) -> Result<u16> {
        self.add(ConstantLong::new(value))
    }

    /// Adds a `CONSTANT_Double`.
    ///
    /// # Errors
    /// Returns [`crate::Error::PoolOverflow`] if the pool is full.
    pub fn double(&mut self, value: f64) -> Result<u16> {
        self.add(ConstantDouble::new(value))
    }

    /// Adds a `CONSTANT_Class` for a name in internal form (`java/lang/Object`).
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn class(&mut self, name: &str) -> Result<u16> {
        let name_index = self.utf8(name)?;
        self.add(ConstantClass::new(name_index))
    }

    /// Adds a `CONSTANT_String` literal.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn string(&mut self, text: &str) -> Result<u16> {
        let string_index = self.utf8(text)?;
        self.add(ConstantString::new(string_index))
    }

    /// Adds a `CONSTANT_NameAndType`.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn name_and_type(&mut self, name: &str, signature: &str) -> Result<u16> {
        let name_index = self.utf8(name)?;
        let signature_index = self.utf8(signature)?;
        self.add(ConstantNameAndType::new(name_index, signature_index))
    }

    /// Adds a `CONSTANT_Fieldref`.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn fieldref(&mut self, class: &str, name: &str, signature: &str) -> Result<u16> {
        let (class_index, nat_index) = self.member(class, name, signature)?;
        self.add(ConstantFieldref::new(class_index, nat_index))
    }

    /// Adds a `CONSTANT_Methodref`.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn methodref(&mut self, class: &str, name: &str, signature: &str) -> Result<u16> {
        let (class_index, nat_index) = self.member(class, name, signature)?;
        self.add(ConstantMethodref::new(class_index, nat_index))
    }

    /// Adds a `CONSTANT_InterfaceMethodref`.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn interface_methodref(
        &mut self,
        class: &str,
        name: &str,
        signature: &str,
    ) -> Result<u16> {
        let (class_index, nat_index) = self.member(class, name, signature)?;
        self.add(ConstantInterfaceMethodref::new(class_index, nat_index))
    }

    fn member(&mut self, class: &str, name: &str, signature: &str) -> Result<(u16, u16)> {
        Ok((self.class(class)?, self.name_and_type(name, signature)?))
    }

    /// Adds a `CONSTANT_MethodHandle` and the member reference its kind calls for.
    ///
    /// `invokeStatic` and `invokeSpecial` handles reference a class method; insert a
    /// `CONSTANT_InterfaceMethodref` and use [`PoolBuilder::add`] for interface targets.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn method_handle(
        &mut self,
        kind: ReferenceKind,
        class: &str,
        name: &str,
        signature: &str,
    ) -> Result<u16> {
        let reference_index = match kind.expected_tag() {
            ConstantTag::Fieldref => self.fieldref(class, name, signature)?,
            ConstantTag::InterfaceMethodref => self.interface_methodref(class, name, signature)?,
            _ => self.methodref(class, name, signature)?,
        };
        self.add(ConstantMethodHandle::new(kind, reference_index))
    }

    /// Adds a `CONSTANT_MethodType`.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn method_type(&mut self, descriptor: &str) -> Result<u16> {
        let descriptor_index = self.utf8(descriptor)?;
        self.add(ConstantMethodType::new(descriptor_index))
    }

    /// Adds a `CONSTANT_Dynamic` for the given bootstrap method slot.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn dynamic(&mut self, bootstrap_method: u16, name: &str, signature: &str) -> Result<u16> {
        let nat_index = self.name_and_type(name, signature)?;
        self.add(ConstantDynamic::new(bootstrap_method, nat_index))
    }

    /// Adds a `CONSTANT_InvokeDynamic` for the given bootstrap method slot.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn invoke_dynamic(
        &mut self,
        bootstrap_method: u16,
        name: &str,
        signature: &str,
    ) -> Result<u16> {
        let nat_index = self.name_and_type(name, signature)?;
        self.add(ConstantInvokeDynamic::new(bootstrap_method, nat_index))
    }

    /// Adds a `CONSTANT_Module`.
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn module(&mut self, name: &str) -> Result<u16> {
        let name_index = self.utf8(name)?;
        self.add(ConstantModule::new(name_index))
    }

    /// Adds a `CONSTANT_Package` for a name in internal form (`java/util`).
    ///
    /// # Errors
    /// Same as [`PoolBuilder::utf8`].
    pub fn package(&mut self, name: &str) -> Result<u16> {
        let name_index = self.utf8(name)?;
        self.add(ConstantPackage::new(name_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_inserts_name_first() {
        let mut builder = PoolBuilder::new();
        let package = builder.package("java/util").unwrap();
        let pool = builder.finish();

        assert_eq!(package, 2);
        assert_eq!(pool.get_as::<ConstantUtf8>(1).unwrap().value().unwrap(), "java/util");
        assert_eq!(pool.describe(package).unwrap(), "java.util");
    }

    #[test]
    fn deduplicates_shared_records() {
        let mut builder = PoolBuilder::new();
        let field = builder
            .fieldref("java/lang/System", "out", "Ljava/io/PrintStream;")
            .unwrap();
        let class = builder.class("java/lang/System").unwrap();
        let name = builder.utf8("out").unwrap();

        assert_eq!(builder.pool().get_as::<ConstantFieldref>(field).unwrap().class_index(), class);
        assert_eq!(builder.utf8("out").unwrap(), name);
        // Utf8 x3, Class, NameAndType, Fieldref
        assert_eq!(builder.pool().len(), 6);
    }

    #[test]
    fn wide_literals_reserve_two_slots() {
        let mut builder = PoolBuilder::new();
        assert_eq!(builder.long(1).unwrap(), 1);
        assert_eq!(builder.double(2.0).unwrap(), 3);
        assert_eq!(builder.long(1).unwrap(), 1);
        assert_eq!(builder.integer(5).unwrap(), 5);
        assert_eq!(builder.pool().len(), 5);
    }

    #[test]
    fn from_pool_reuses_existing() {
        let mut pool = ConstantPool::new();
        pool.insert(ConstantUtf8::new("java/lang/Object").unwrap()).unwrap();
        pool.insert(ConstantClass::new(1)).unwrap();

        let mut builder = PoolBuilder::from_pool(pool);
        assert_eq!(builder.class("java/lang/Object").unwrap(), 2);
        assert_eq!(builder.string("java/lang/Object").unwrap(), 3);
    }

    #[test]
    fn method_handle_picks_member_kind() {
        let mut builder = PoolBuilder::new();
        let getter = builder
            .method_handle(ReferenceKind::GetStatic, "a/B", "c", "I")
            .unwrap();
        let call = builder
            .method_handle(ReferenceKind::InvokeInterface, "a/I", "run", "()V")
            .unwrap();
        let pool = builder.finish();

        let getter = pool.get_as::<ConstantMethodHandle>(getter).unwrap();
        assert_eq!(getter.target(&pool).unwrap().tag(), ConstantTag::Fieldref);
        let call = pool.get_as::<ConstantMethodHandle>(call).unwrap();
        assert_eq!(
            call.target(&pool).unwrap().tag(),
            ConstantTag::InterfaceMethodref
        );
    }

    #[test]
    fn indy_and_method_type() {
        let mut builder = PoolBuilder::new();
        let indy = builder
            .invoke_dynamic(0, "get", "()Ljava/util/function/Supplier;")
            .unwrap();
        let condy = builder.dynamic(1, "VALUE", "I").unwrap();
        let mt = builder.method_type("()V").unwrap();
        let module = builder.module("java.base").unwrap();
        let pool = builder.finish();

        assert_eq!(
            pool.describe(indy).unwrap(),
            "0:get ()Ljava/util/function/Supplier;"
        );
        assert_eq!(pool.describe(condy).unwrap(), "1:VALUE I");
        assert_eq!(pool.describe(mt).unwrap(), "()V");
        assert_eq!(pool.describe(module).unwrap(), "java.base");
        assert!(pool.validate().is_ok());
    }
}
