use super::types::Element;

/// A labelled atom with a net point charge and an optional Cartesian position.
///
/// Labels are 1-based and follow the order atoms appear in their source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub label: usize,
    pub element: Element,
    pub charge: f64,
    pub position: Option<[f64; 3]>,
}

impl Atom {
    pub fn new(label: usize, element: Element, charge: f64, position: [f64; 3]) -> Self {
        Self {
            label,
            element,
            charge,
            position: Some(position),
        }
    }

    pub fn without_position(label: usize, element: Element, charge: f64) -> Self {
        Self {
            label,
            element,
            charge,
            position: None,
        }
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.element.atomic_number()
    }
}
