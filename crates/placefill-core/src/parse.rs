//! Conversion of provider lookup results into [`ResolvedAddress`]es.
//!
//! Both parsers return `None` when the result has no usable display address;
//! every other field is best effort.

use crate::local::LocalPlacemark;
use crate::model::{Coordinate, ResolvedAddress};
use crate::types::{AddressComponent, DetailsResponse};

/// Which name of an address component to read.
#[derive(Debug, Clone, Copy)]
enum NameForm {
    Short,
    Long,
}

/// Returns the requested name of the first component tagged with `kind`.
///
/// Only the first match is consulted; if it lacks the requested name the
/// result is `None` even when a later component would have one.
fn component(components: &[AddressComponent], kind: &str, form: NameForm) -> Option<String> {
    let found = components.iter().find(|c| {
        c.types
            .as_ref()
            .is_some_and(|types| types.iter().any(|t| t == kind))
    })?;
    match form {
        NameForm::Short => found.short_name.clone(),
        NameForm::Long => found.long_name.clone(),
    }
}

/// Parses a place-details response.
///
/// Returns `None` when `result.formatted_address` is missing.
#[must_use]
pub fn parse_place_details(response: &DetailsResponse) -> Option<ResolvedAddress> {
    let result = response.result.as_ref()?;
    let mut address = ResolvedAddress::new(result.formatted_address.clone()?);

    if let Some(components) = result.address_components.as_deref() {
        address.street_number = component(components, "street_number", NameForm::Short);
        address.route = component(components, "route", NameForm::Short);
        address.postal_code = component(components, "postal_code", NameForm::Long);
        address.city = component(components, "locality", NameForm::Long);
        address.state = component(components, "administrative_area_level_1", NameForm::Short);
        address.country = component(components, "country", NameForm::Long);
        address.iso_country_code = component(components, "country", NameForm::Short);
    }

    address.coordinate = result
        .geometry
        .as_ref()
        .and_then(|g| g.location.as_ref())
        .and_then(|loc| Some(Coordinate::new(loc.lat?, loc.lng?)));

    Some(address)
}

/// Parses a local-search placemark.
///
/// Returns `None` when the placemark has no title (or an empty one). Absent
/// attributes become empty strings; the coordinate is always set.
#[must_use]
pub fn parse_placemark(placemark: &LocalPlacemark) -> Option<ResolvedAddress> {
    let title = placemark.title.as_deref().filter(|t| !t.is_empty())?;
    let or_empty = |field: &Option<String>| Some(field.clone().unwrap_or_default());

    Some(ResolvedAddress {
        formatted_address: title.to_string(),
        street_number: or_empty(&placemark.sub_thoroughfare),
        route: or_empty(&placemark.thoroughfare),
        postal_code: or_empty(&placemark.postal_code),
        city: or_empty(&placemark.sub_administrative_area),
        state: or_empty(&placemark.administrative_area),
        country: or_empty(&placemark.country),
        iso_country_code: or_empty(&placemark.iso_country_code),
        coordinate: Some(placemark.coordinate),
    })
}
