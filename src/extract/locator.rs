//! Declarative locators and ordered locator chains.

use scraper::{ElementRef, Selector};

use crate::utils::{collapse_whitespace, parse_selector_with_fallback};

/// A rule identifying a sub-element, and optionally one of its attributes,
/// inside a scope element.
#[derive(Debug, Clone)]
pub struct Locator {
    pub path: &'static str,
    /// Attribute to read; `None` reads the element's text content
    pub attr: Option<&'static str>,
    selector: Selector,
}

impl Locator {
    pub fn new(path: &'static str, attr: Option<&'static str>) -> Self {
        Locator {
            path,
            attr,
            selector: parse_selector_with_fallback(path, "locator"),
        }
    }

    pub fn text(path: &'static str) -> Self {
        Self::new(path, None)
    }

    pub fn attribute(path: &'static str, attr: &'static str) -> Self {
        Self::new(path, Some(attr))
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Every non-empty value this locator reads inside `scope`, in document order.
    pub fn values<'a>(&'a self, scope: ElementRef<'a>) -> impl Iterator<Item = String> + 'a {
        scope
            .select(&self.selector)
            .filter_map(move |element| self.read(element))
    }

    /// First non-empty value inside `scope`.
    pub fn first(&self, scope: ElementRef<'_>) -> Option<String> {
        self.values(scope).next()
    }

    fn read(&self, element: ElementRef<'_>) -> Option<String> {
        let value = match self.attr {
            Some(attr) => element.value().attr(attr)?.trim().to_string(),
            None => collapse_whitespace(&element.text().collect::<String>()),
        };
        (!value.is_empty()).then_some(value)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.attr {
            Some(attr) => write!(f, "{}@{}", self.path, attr),
            None => f.write_str(self.path),
        }
    }
}

/// Ordered fallback list of locators for one field. Evaluated in fixed order.
#[derive(Debug, Clone)]
pub struct LocatorChain {
    pub name: &'static str,
    locators: Vec<Locator>,
}

impl LocatorChain {
    pub fn new(name: &'static str, locators: Vec<Locator>) -> Self {
        LocatorChain { name, locators }
    }

    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    /// Value of the first locator that produces a non-empty value.
    pub fn first(&self, scope: ElementRef<'_>) -> Option<String> {
        self.locators.iter().find_map(|locator| {
            let value = locator.first(scope);
            if value.is_some() {
                log::trace!("{}: matched {}", self.name, locator);
            }
            value
        })
    }

    /// Every value of every locator, chain order first, document order second.
    pub fn candidates<'a>(&'a self, scope: ElementRef<'a>) -> impl Iterator<Item = String> + 'a {
        self.locators
            .iter()
            .flat_map(move |locator| locator.values(scope))
    }
}
