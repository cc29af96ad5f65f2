//! Partial-thread hexagon head screw (ISO 4014)
//!
//! ```text
//!      |<-k->|
//!      :_____:
//!      /     |
//!      |     |
//!      y     |____________________              ______
//!      |     |     ^              \/\/\/\/\/\/\/\  ^
//!      |     |     |              \\\\\\\\\\\\\\\) |
//!      +-----+-->  |ds            \\\\\\\\\\\\\\\| |d
//!     O|     |  z  |              \\\\\\\\\\\\\\\) |
//!      |     |_____v______________/\/\/\/\/\/\/\/__v__
//!      |     |                    |              |
//!      \_____|                    |<-----b------>|
//!            :                                   |
//!            |<------------length--------------->|
//! ```
//!
//! The head is the hexagon of width `s` extruded by `k` along +Z. The
//! shaft is a plain cylinder of diameter `ds` from the origin to
//! `length + k`; the thread itself is not modelled.

use serde::Serialize;
use std::borrow::Cow;
use std::f64::consts::PI;
use tracing::debug;

use crate::core::object::{DocumentObject, ObjectError, ScriptedObject};
use crate::core::property::{Assignment, PropertyType};
use crate::core::units::Length;
use crate::geometry::hexagon::{circumradius, hexagon_area, hexagon_points};
use crate::geometry::kernel::Result as KernelResult;
use crate::geometry::{BoundingBox, GeometryKernel, Vector};
use crate::standards::{iso4014, ScrewSize, SizeTable};

/// Property editor group for the screw's properties
pub const PROPERTY_GROUP: &str = "PartialHexScrewISO4014";

/// Shaft length of a freshly created screw
pub const DEFAULT_LENGTH: Length = Length::from_mm(15.0);

pub const SIZE: &str = "size";
pub const LENGTH: &str = "length";

/// Properties whose change invalidates the shape
const PROPERTY_NAMES: [&str; 2] = [SIZE, LENGTH];

/// Scripted proxy for a partial-thread hex head screw
#[derive(Debug, Clone)]
pub struct PartialHexScrew {
    table: Cow<'static, SizeTable>,
    default_length: Length,
}

impl Default for PartialHexScrew {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialHexScrew {
    /// Screw sized from the built-in ISO 4014 table
    pub fn new() -> Self {
        Self {
            table: Cow::Borrowed(iso4014()),
            default_length: DEFAULT_LENGTH,
        }
    }

    /// Screw sized from a custom table
    pub fn with_table(table: SizeTable) -> Self {
        Self {
            table: Cow::Owned(table),
            default_length: DEFAULT_LENGTH,
        }
    }

    /// Override the length new objects start with
    pub fn default_length(mut self, length: Length) -> Self {
        self.default_length = length;
        self
    }

    pub fn table(&self) -> &SizeTable {
        &self.table
    }
}

impl<K: GeometryKernel> ScriptedObject<K> for PartialHexScrew {
    fn type_name(&self) -> &'static str {
        "PartialHexScrewISO4014"
    }

    fn attach(&self, obj: &mut DocumentObject<K::Shape>) -> Result<(), ObjectError> {
        // Numeric order so the drop-down reads M3, M4, ... M36
        obj.properties
            .add(PropertyType::Enumeration, SIZE, PROPERTY_GROUP, "ISO size of the screw")?
            .assign(Assignment::Choices(self.table.designations()))?;
        obj.properties
            .add(
                PropertyType::Length,
                LENGTH,
                PROPERTY_GROUP,
                "The length of the screw shaft",
            )?
            .assign(Assignment::Length(self.default_length))?;
        Ok(())
    }

    fn on_changed(
        &self,
        obj: &mut DocumentObject<K::Shape>,
        kernel: &K,
        prop: &str,
    ) -> Result<(), ObjectError> {
        if PROPERTY_NAMES.contains(&prop) {
            self.execute(obj, kernel)
        } else {
            Ok(())
        }
    }

    fn execute(&self, obj: &mut DocumentObject<K::Shape>, kernel: &K) -> Result<(), ObjectError> {
        let size = obj
            .properties
            .enumeration(SIZE)?
            .ok_or_else(|| ObjectError::Unset(SIZE.to_string()))?;
        let data = self.table.get(size)?;

        let length = obj.properties.length(LENGTH)?;
        if !length.is_positive() {
            return Err(ObjectError::InvalidValue {
                property: LENGTH.to_string(),
                reason: format!("must be positive, got {}", length),
            });
        }

        debug!(size = %data.designation, length = length.mm(), "building screw");
        let shape = build_screw(kernel, data, length.mm())?;
        obj.set_shape(shape);
        Ok(())
    }
}

/// Build the screw solid: hexagonal head prism fused with the shaft
pub fn build_screw<K: GeometryKernel>(
    kernel: &K,
    size: &ScrewSize,
    length: f64,
) -> KernelResult<K::Shape> {
    let outline = kernel.make_polygon(&hexagon_points(size.s.max))?;
    let hexagon = kernel.make_face(&outline)?;

    let k = size.k_nom;
    let head = kernel.extrude(&hexagon, Vector::new(0.0, 0.0, k))?;
    let shaft = kernel.make_cylinder(0.5 * size.ds.max, length + k, Vector::ZERO, Vector::Z)?;

    kernel.fuse(&head, &shaft)
}

/// Derived dimensions of a modelled screw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrewGeometry {
    pub designation: String,
    /// Nominal length l (under the head)
    pub length: f64,
    /// Modelled head height (k nominal)
    pub head_height: f64,
    /// Modelled across-flats width (s max)
    pub across_flats: f64,
    /// Across-corners width e of the modelled hexagon
    pub across_corners: f64,
    /// Modelled shaft diameter (ds max)
    pub shaft_diameter: f64,
    /// Head plus shaft
    pub overall_length: f64,
    /// Reference thread length b for this length, if listed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_length: Option<f64>,
    /// Volume of the modelled solid (mm^3)
    pub volume: f64,
    pub bounding_box: BoundingBox,
}

impl ScrewGeometry {
    pub fn new(size: &ScrewSize, length: f64) -> Self {
        let s = size.s.max;
        let k = size.k_nom;
        let r = 0.5 * size.ds.max;
        let e = 2.0 * circumradius(s);

        // The shaft lies inside the head prism, so only the part past the
        // head adds volume
        let volume = hexagon_area(s) * k + PI * r * r * length;

        Self {
            designation: size.designation.to_string(),
            length,
            head_height: k,
            across_flats: s,
            across_corners: e,
            shaft_diameter: 2.0 * r,
            overall_length: length + k,
            thread_length: size.reference_thread_length(length),
            volume,
            bounding_box: BoundingBox {
                min: Vector::new(-0.5 * e, -0.5 * s, 0.0),
                max: Vector::new(0.5 * e, 0.5 * s, length + k),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::ScriptedFeature;
    use crate::geometry::{ConstructionKernel, KernelError, Shape};
    use std::cell::RefCell;

    fn screw() -> ScriptedFeature<ConstructionKernel, PartialHexScrew> {
        ScriptedFeature::new("Screw", PartialHexScrew::new(), ConstructionKernel::new()).unwrap()
    }

    #[test]
    fn test_construction_declares_properties() {
        let screw = screw();
        let props = &screw.object().properties;

        assert_eq!(props.names().collect::<Vec<_>>(), vec![SIZE, LENGTH]);
        assert_eq!(props.enumeration(SIZE).unwrap(), Some("M3"));
        assert_eq!(props.length(LENGTH).unwrap(), Length::from_mm(15.0));

        let size = props.get(SIZE).unwrap();
        assert_eq!(size.group, PROPERTY_GROUP);
        assert_eq!(size.doc, "ISO size of the screw");
        match &size.value {
            crate::core::property::PropertyValue::Enumeration { choices, .. } => {
                assert_eq!(choices.first().map(String::as_str), Some("M3"));
                assert_eq!(choices.last().map(String::as_str), Some("M36"));
                assert_eq!(choices[4], "M8");
            }
            other => panic!("expected an enumeration, got {:?}", other),
        }
        assert!(screw.shape().is_none());
    }

    #[test]
    fn test_size_change_rebuilds_shape() {
        let mut screw = screw();
        screw.set_property(SIZE, "M8").unwrap();

        let shape = screw.shape().unwrap();
        let Shape::Fuse { shapes } = shape else {
            panic!("expected a fuse, got {:?}", shape);
        };
        assert_eq!(shapes.len(), 2);

        match &shapes[0] {
            Shape::Extrusion { direction, .. } => assert_eq!(*direction, Vector::new(0.0, 0.0, 5.3)),
            other => panic!("expected the head prism, got {:?}", other),
        }
        match &shapes[1] {
            Shape::Cylinder {
                radius,
                height,
                base,
                axis,
            } => {
                assert_eq!(*radius, 4.0);
                assert!((height - 20.3).abs() < 1e-12);
                assert_eq!(*base, Vector::ZERO);
                assert_eq!(*axis, Vector::Z);
            }
            other => panic!("expected the shaft, got {:?}", other),
        }
    }

    #[test]
    fn test_length_change_rebuilds_shape() {
        let mut screw = screw();
        screw.set_property(LENGTH, Length::from_mm(40.0)).unwrap();

        let bb = screw.shape().unwrap().bounding_box();
        // M3: k = 2
        assert!((bb.max.z - 42.0).abs() < 1e-9);
        assert_eq!(bb.min.z, 0.0);
    }

    #[test]
    fn test_unrelated_property_is_ignored() {
        let mut screw = screw();
        let kernel = ConstructionKernel::new();
        let mut object = screw.object().clone();
        ScriptedObject::<ConstructionKernel>::on_changed(
            screw.proxy(),
            &mut object,
            &kernel,
            "Label",
        )
        .unwrap();
        assert!(object.shape().is_none());

        screw.recompute().unwrap();
        assert!(screw.shape().is_some());
    }

    #[test]
    fn test_non_positive_length_keeps_previous_shape() {
        let mut screw = screw();
        screw.recompute().unwrap();
        let before = screw.shape().cloned();

        let err = screw.set_property(LENGTH, Length::from_mm(0.0)).unwrap_err();
        assert!(matches!(err, ObjectError::InvalidValue { ref property, .. } if property == LENGTH));
        assert_eq!(screw.shape().cloned(), before);
    }

    #[test]
    fn test_shape_bounds_match_analytic_geometry() {
        let table = iso4014();
        for size in table.sizes.iter() {
            let shape = build_screw(&ConstructionKernel, size, 50.0).unwrap();
            let geometry = ScrewGeometry::new(size, 50.0);
            let bb = shape.bounding_box();
            assert!(bb.min.is_equal(&geometry.bounding_box.min, 1e-9), "{}", size.designation);
            assert!(bb.max.is_equal(&geometry.bounding_box.max, 1e-9), "{}", size.designation);
        }
    }

    #[test]
    fn test_screw_geometry_values() {
        let m10 = iso4014().get("M10").unwrap();
        let g = ScrewGeometry::new(m10, 100.0);

        assert_eq!(g.head_height, 6.4);
        assert_eq!(g.across_flats, 16.0);
        assert!((g.across_corners - 32.0 / 3f64.sqrt()).abs() < 1e-9);
        assert_eq!(g.shaft_diameter, 10.0);
        assert!((g.overall_length - 106.4).abs() < 1e-9);
        assert_eq!(g.thread_length, Some(26.0));

        let head = 1.5 * 3f64.sqrt() * (16.0 / 3f64.sqrt()).powi(2) * 6.4;
        let shaft = PI * 25.0 * 100.0;
        assert!((g.volume - (head + shaft)).abs() < 1e-6);
    }

    #[test]
    fn test_custom_table() {
        let mut table = iso4014().clone();
        table.sizes = Cow::Owned(vec![table.get("M6").unwrap().clone()]);
        let proxy = PartialHexScrew::with_table(table).default_length(Length::from_mm(30.0));

        let mut screw = ScriptedFeature::new("Custom", proxy, ConstructionKernel).unwrap();
        assert_eq!(screw.object().properties.enumeration(SIZE).unwrap(), Some("M6"));
        assert_eq!(screw.object().properties.length(LENGTH).unwrap(), Length::from_mm(30.0));
        assert!(screw.set_property(SIZE, "M8").is_err());
        screw.recompute().unwrap();
    }

    /// Kernel that only logs the calls it receives
    #[derive(Default)]
    struct CallLog {
        calls: RefCell<Vec<String>>,
    }

    impl GeometryKernel for CallLog {
        type Shape = &'static str;

        fn make_polygon(&self, points: &[Vector]) -> KernelResult<Self::Shape> {
            self.calls.borrow_mut().push(format!("polygon({})", points.len()));
            Ok("wire")
        }

        fn make_face(&self, _wire: &Self::Shape) -> KernelResult<Self::Shape> {
            self.calls.borrow_mut().push("face".to_string());
            Ok("face")
        }

        fn extrude(&self, _face: &Self::Shape, direction: Vector) -> KernelResult<Self::Shape> {
            self.calls.borrow_mut().push(format!("extrude({})", direction.z));
            Ok("head")
        }

        fn make_cylinder(
            &self,
            radius: f64,
            height: f64,
            _base: Vector,
            _axis: Vector,
        ) -> KernelResult<Self::Shape> {
            self.calls.borrow_mut().push(format!("cylinder({}, {})", radius, height));
            Ok("shaft")
        }

        fn fuse(&self, a: &Self::Shape, b: &Self::Shape) -> KernelResult<Self::Shape> {
            self.calls.borrow_mut().push(format!("fuse({}, {})", a, b));
            if *a == "head" && *b == "shaft" {
                Ok("screw")
            } else {
                Err(KernelError::BooleanFailed("unexpected operands".into()))
            }
        }
    }

    #[test]
    fn test_kernel_call_sequence() {
        let m4 = iso4014().get("M4").unwrap();
        let kernel = CallLog::default();
        let shape = build_screw(&kernel, m4, 10.0).unwrap();

        assert_eq!(shape, "screw");
        assert_eq!(
            *kernel.calls.borrow(),
            vec![
                "polygon(7)",
                "face",
                "extrude(2.8)",
                "cylinder(2, 12.8)",
                "fuse(head, shaft)",
            ]
        );
    }
}
