// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Closed set of cached views and the kind-to-view factory.

use std::fmt;
use std::sync::{Arc, Weak};

use netstore_model::{AnyResource, ResourceType};

use crate::index::ResourceIndex;
use crate::view::{
    BundleView, BusbarSectionView, Extendable, GeneratorView, Identifiable, LineView, LoadView,
    NetworkView, SubstationView, SwitchView, TwoWindingsTransformerView, VoltageLevelView,
};

/// A typed view that can be recovered from an [`Equipment`].
pub trait View: BundleView + Extendable + Sized + 'static {
    /// Kind served by this view.
    const KIND: ResourceType;

    /// Unwraps `equipment` if it holds this view type.
    fn downcast(equipment: Equipment) -> Option<Arc<Self>>;

    /// Borrowing form of [`downcast`](Self::downcast).
    fn downcast_ref(equipment: &Equipment) -> Option<&Arc<Self>>;
}

/// Ids of the containers that directly hold an element.
///
/// Voltage levels are held by their substation; connectables by the voltage
/// level of each terminal.
pub(crate) trait Contained {
    fn container_ids(&self) -> Vec<String>;
}

macro_rules! equipment {
    ($($kind:ident => $view:ident),+ $(,)?) => {
        /// A cached view of any kind.
        ///
        /// Cloning is cheap and keeps identity: clones share the same view.
        #[derive(Clone)]
        pub enum Equipment {
            $(
                #[doc = concat!("See [`", stringify!($view), "`].")]
                $kind(Arc<$view>),
            )+
        }

        impl Equipment {
            /// Builds the view matching the bundle's kind.
            pub(crate) fn build(index: &Weak<ResourceIndex>, bundle: AnyResource) -> Self {
                match bundle {
                    $(AnyResource::$kind(r) => Self::$kind(Arc::new($view::build(index.clone(), r))),)+
                }
            }

            /// Identity and property surface.
            pub fn as_identifiable(&self) -> &dyn Identifiable {
                match self {
                    $(Self::$kind(v) => v.as_ref(),)+
                }
            }

            /// Extension surface.
            pub fn as_extendable(&self) -> &dyn Extendable {
                match self {
                    $(Self::$kind(v) => v.as_ref(),)+
                }
            }

            /// Copy of the underlying bundle as it stands now.
            pub fn snapshot(&self) -> AnyResource {
                match self {
                    $(Self::$kind(v) => v.core().snapshot().into(),)+
                }
            }

            /// Returns `true` if both handles designate the same cached view.
            pub fn ptr_eq(&self, other: &Self) -> bool {
                match (self, other) {
                    $((Self::$kind(a), Self::$kind(b)) => Arc::ptr_eq(a, b),)+
                    _ => false,
                }
            }

            pub(crate) fn container_ids(&self) -> Vec<String> {
                match self {
                    $(Self::$kind(v) => v.container_ids(),)+
                }
            }
        }

        $(
            impl View for $view {
                const KIND: ResourceType = ResourceType::$kind;

                fn downcast(equipment: Equipment) -> Option<Arc<Self>> {
                    match equipment {
                        Equipment::$kind(v) => Some(v),
                        _ => None,
                    }
                }

                fn downcast_ref(equipment: &Equipment) -> Option<&Arc<Self>> {
                    match equipment {
                        Equipment::$kind(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl From<Arc<$view>> for Equipment {
                fn from(view: Arc<$view>) -> Self {
                    Self::$kind(view)
                }
            }
        )+
    };
}

equipment! {
    Network => NetworkView,
    Substation => SubstationView,
    VoltageLevel => VoltageLevelView,
    BusbarSection => BusbarSectionView,
    Load => LoadView,
    Generator => GeneratorView,
    Switch => SwitchView,
    Line => LineView,
    TwoWindingsTransformer => TwoWindingsTransformerView,
}

impl Equipment {
    /// Identifier of the element.
    pub fn id(&self) -> &str {
        self.as_identifiable().id()
    }

    /// Kind of the element.
    pub fn resource_type(&self) -> ResourceType {
        self.as_identifiable().resource_type()
    }

    /// Typed view, if this is a `V`.
    pub fn downcast<V: View>(self) -> Option<Arc<V>> {
        V::downcast(self)
    }
}

impl fmt::Debug for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equipment")
            .field("type", &self.resource_type())
            .field("id", &self.id())
            .finish()
    }
}
