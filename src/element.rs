use thiserror::Error as ThisError;

use crate::{Attribute, Value};

#[derive(Debug, ThisError)]
pub enum LookupError {
    #[error("Element Not Found: {0}")]
    ElementNotFound(String),
    #[error("Child Element Not Found: {0}")]
    ChildNotFound(String),
    #[error("Element Does Not Have Attribute: {0}")]
    AttributeNotFound(String),
}

/// A single named node in the document tree.
///
/// An element owns an ordered list of attributes and an ordered list of
/// child elements. Neither attribute names nor child names need to be
/// unique; lookups return the first match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Element>,
}

impl Element {
    /// Creates a new element with the given name and no attributes or
    /// children.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the name of the element.
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Sets the name of the element.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends a new empty child element and returns a mutable reference
    /// to it.
    pub fn create_child(&mut self, name: impl Into<String>) -> &mut Element {
        self.add_child(Element::named(name))
    }

    /// Appends an already built element as the last child and returns a
    /// mutable reference to it.
    pub fn add_child(&mut self, element: Element) -> &mut Element {
        let index = self.children.len();
        self.children.push(element);
        &mut self.children[index]
    }

    /// Returns the first child with the given name. If no child matches,
    /// returns None.
    pub fn get_child(&self, name: impl AsRef<str>) -> Option<&Element> {
        let child_name = name.as_ref();
        self.children.iter().find(|child| child.name == child_name)
    }

    /// Returns the first child with the given name.
    pub fn child(&self, name: impl AsRef<str>) -> Result<&Element, LookupError> {
        self.get_child(name.as_ref())
            .ok_or_else(|| LookupError::ChildNotFound(name.as_ref().to_string()))
    }

    /// Returns the first child with the given name mutably.
    pub fn child_mut(&mut self, name: impl AsRef<str>) -> Result<&mut Element, LookupError> {
        let child_name = name.as_ref();
        self.children
            .iter_mut()
            .find(|child| child.name == child_name)
            .ok_or_else(|| LookupError::ChildNotFound(child_name.to_string()))
    }

    /// Returns the children of the element in insertion order.
    pub fn get_children(&self) -> &[Element] {
        &self.children
    }

    /// Appends an attribute with the given name. Duplicate names are
    /// allowed and kept in insertion order.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.push(Attribute::new(name, value));
    }

    /// Appends every attribute from the given sequence.
    pub fn add_attributes(&mut self, attributes: impl IntoIterator<Item = Attribute>) {
        self.attributes.extend(attributes);
    }

    /// Returns the first attribute with the given name. If no attribute
    /// matches, returns None.
    pub fn get_attribute(&self, name: impl AsRef<str>) -> Option<&Attribute> {
        let attribute_name = name.as_ref();
        self.attributes.iter().find(|attribute| attribute.get_name() == attribute_name)
    }

    /// Returns the first attribute with the given name.
    pub fn attribute(&self, name: impl AsRef<str>) -> Result<&Attribute, LookupError> {
        self.get_attribute(name.as_ref())
            .ok_or_else(|| LookupError::AttributeNotFound(name.as_ref().to_string()))
    }

    /// Returns the attributes of the element in insertion order.
    pub fn get_attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the value of the first attribute with the given name. If no
    /// attribute matches or the value is not the requested type, returns
    /// None.
    pub fn get_value<'a, V>(&'a self, name: impl AsRef<str>) -> Option<&'a V>
    where
        &'a V: TryFrom<&'a Value>,
    {
        self.get_attribute(name).and_then(|attribute| attribute.get_value().try_into().ok())
    }
}

/// An ordered forest of root [Element]s. The document owns the whole tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new empty root element and returns a mutable reference
    /// to it.
    pub fn create_element(&mut self, name: impl Into<String>) -> &mut Element {
        self.add_element(Element::named(name))
    }

    /// Appends an already built element as the last root and returns a
    /// mutable reference to it.
    pub fn add_element(&mut self, element: Element) -> &mut Element {
        let index = self.elements.len();
        self.elements.push(element);
        &mut self.elements[index]
    }

    /// Returns the first root element with the given name. If no element
    /// matches, returns None.
    pub fn get_element(&self, name: impl AsRef<str>) -> Option<&Element> {
        let element_name = name.as_ref();
        self.elements.iter().find(|element| element.get_name() == element_name)
    }

    /// Returns the first root element with the given name.
    pub fn element(&self, name: impl AsRef<str>) -> Result<&Element, LookupError> {
        self.get_element(name.as_ref())
            .ok_or_else(|| LookupError::ElementNotFound(name.as_ref().to_string()))
    }

    /// Returns the first root element with the given name mutably.
    pub fn element_mut(&mut self, name: impl AsRef<str>) -> Result<&mut Element, LookupError> {
        let element_name = name.as_ref();
        self.elements
            .iter_mut()
            .find(|element| element.get_name() == element_name)
            .ok_or_else(|| LookupError::ElementNotFound(element_name.to_string()))
    }

    /// Returns the root elements in insertion order.
    pub fn get_elements(&self) -> &[Element] {
        &self.elements
    }
}
