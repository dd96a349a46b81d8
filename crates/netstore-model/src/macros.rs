// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Boilerplate impls shared by the attribute records.

/// Implements [`crate::IdentifiableAttributes`] for a record carrying `name`
/// and `properties` fields.
macro_rules! impl_identifiable {
    ($ty:ty, $kind:ident) => {
        impl crate::resource::IdentifiableAttributes for $ty {
            const TYPE: crate::resource::ResourceType = crate::resource::ResourceType::$kind;

            fn name(&self) -> Option<&str> {
                self.name.as_deref()
            }

            fn properties(&self) -> &crate::properties::PropertyMap {
                &self.properties
            }

            fn properties_mut(&mut self) -> &mut crate::properties::PropertyMap {
                &mut self.properties
            }
        }
    };
}
