//! Per-kind callbacks over constant pool records.
//!
//! [`ConstantVisitor`] has one required method per record kind, so adding a kind to
//! [`crate::Constant`] breaks every visitor at compile time instead of silently skipping it.
use crate::constants::{
    ConstantClass, ConstantDouble, ConstantDynamic, ConstantFieldref, ConstantFloat,
    ConstantInteger, ConstantInterfaceMethodref, ConstantInvokeDynamic, ConstantLong,
    ConstantMethodHandle, ConstantMethodType, ConstantMethodref, ConstantModule,
    ConstantNameAndType, ConstantPackage, ConstantString, ConstantUtf8,
};

/// Receives exactly one callback per record passed to [`crate::Constant::accept`].
///
/// # Examples
///
/// Counting text records in a pool:
///
/// ```rust
/// use classpool::prelude::*;
///
/// #[derive(Default)]
/// struct Counter {
///     utf8: usize,
///     other: usize,
/// }
///
/// impl ConstantVisitor for Counter {
///     fn visit_utf8(&mut self, _: &ConstantUtf8) { self.utf8 += 1; }
///     fn visit_integer(&mut self, _: &ConstantInteger) { self.other += 1; }
///     fn visit_float(&mut self, _: &ConstantFloat) { self.other += 1; }
///     fn visit_long(&mut self, _: &ConstantLong) { self.other += 1; }
///     fn visit_double(&mut self, _: &ConstantDouble) { self.other += 1; }
///     fn visit_class(&mut self, _: &ConstantClass) { self.other += 1; }
///     fn visit_string(&mut self, _: &ConstantString) { self.other += 1; }
///     fn visit_fieldref(&mut self, _: &ConstantFieldref) { self.other += 1; }
///     fn visit_methodref(&mut self, _: &ConstantMethodref) { self.other += 1; }
///     fn visit_interface_methodref(&mut self, _: &ConstantInterfaceMethodref) { self.other += 1; }
///     fn visit_name_and_type(&mut self, _: &ConstantNameAndType) { self.other += 1; }
///     fn visit_method_handle(&mut self, _: &ConstantMethodHandle) { self.other += 1; }
///     fn visit_method_type(&mut self, _: &ConstantMethodType) { self.other += 1; }
///     fn visit_dynamic(&mut self, _: &ConstantDynamic) { self.other += 1; }
///     fn visit_invoke_dynamic(&mut self, _: &ConstantInvokeDynamic) { self.other += 1; }
///     fn visit_module(&mut self, _: &ConstantModule) { self.other += 1; }
///     fn visit_package(&mut self, _: &ConstantPackage) { self.other += 1; }
/// }
///
/// let mut pool = ConstantPool::new();
/// let name = pool.insert(ConstantUtf8::new("java/lang/Object")?)?;
/// pool.insert(ConstantClass::new(name))?;
///
/// let mut counter = Counter::default();
/// pool.accept(&mut counter);
/// assert_eq!((counter.utf8, counter.other), (1, 1));
/// # Ok::<(), classpool::Error>(())
/// ```
#[allow(missing_docs)]
pub trait ConstantVisitor {
    fn visit_utf8(&mut self, constant: &ConstantUtf8);
    fn visit_integer(&mut self, constant: &ConstantInteger);
    fn visit_float(&mut self, constant: &ConstantFloat);
    fn visit_long(&mut self, constant: &ConstantLong);
    fn visit_double(&mut self, constant: &ConstantDouble);
    fn visit_class(&mut self, constant: &ConstantClass);
    fn visit_string(&mut self, constant: &ConstantString);
    fn visit_fieldref(&mut self, constant: &ConstantFieldref);
    fn visit_methodref(&mut self, constant: &ConstantMethodref);
    fn visit_interface_methodref(&mut self, constant: &ConstantInterfaceMethodref);
    fn visit_name_and_type(&mut self, constant: &ConstantNameAndType);
    fn visit_method_handle(&mut self, constant: &ConstantMethodHandle);
    fn visit_method_type(&mut self, constant: &ConstantMethodType);
    fn visit_dynamic(&mut self, constant: &ConstantDynamic);
    fn visit_invoke_dynamic(&mut self, constant: &ConstantInvokeDynamic);
    fn visit_module(&mut self, constant: &ConstantModule);
    fn visit_package(&mut self, constant: &ConstantPackage);
}
