use serde_json::Value;

use super::fields::Fields;
use super::text::cleanup;
use crate::error::ExtractError;
use crate::record::{ContactOptions, DetailRecord};

/// Location of the property object inside a detail page's `__NEXT_DATA__`.
pub const PROPERTY_PATH: &str = "props.pageProps.propertyResult.property";

/// Maps a decoded detail page onto a [`DetailRecord`].
///
/// Any required field that is absent or of the wrong type fails the
/// whole record; callers skip that listing.
pub fn to_detail_record(doc: &Value) -> Result<DetailRecord, ExtractError> {
    let property = Fields::new(doc, "").get(PROPERTY_PATH)?;
    let p = Fields::new(property, PROPERTY_PATH);

    let images = p
        .items("images.property")?
        .iter()
        .map(|image| image.fields().scalar("full"))
        .collect::<Result<Vec<_>, _>>()?;

    let mut contact_options = ContactOptions::new();
    for contact in p.items("contact_options")? {
        let contact = contact.fields();
        contact_options.insert(contact.scalar("type")?, contact.text("value")?);
    }

    let amenities = p
        .items("amenities")?
        .iter()
        .map(|amenity| amenity.fields().text("name"))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DetailRecord {
        id: p.scalar("id")?,
        property_type: p.text("property_type")?.trim().to_string(),
        price: format!("{} {}", p.scalar("price.value")?, p.text("price.currency")?),
        ad_title: cleanup(&p.text("title")?),
        location_description: cleanup(&p.text("location.full_name")?),
        location_coordinates_lat_lon: format!(
            "{}, {}",
            p.scalar("location.coordinates.lat")?,
            p.scalar("location.coordinates.lon")?
        ),
        images,
        agent_name: p.text("agent.name")?,
        agent_email: p.text("agent.email")?,
        agent_social: p.text("agent.social")?,
        agent_languages: p.strings("agent.languages")?,
        broker_name: p.text("broker.name")?,
        broker_logo: p.text("broker.logo")?,
        broker_address: cleanup(&p.text("broker.address")?),
        broker_email: p.text("broker.email")?,
        broker_phone: p.text("broker.phone")?,
        is_verified: p.flag("is_verified")?,
        is_direct_from_developer: p.flag("is_direct_from_developer")?,
        is_new_construction: p.flag("is_new_construction")?,
        is_available: p.flag("is_available")?,
        is_new_insert: p.flag("is_new_insert")?,
        live_viewing: p.optional_flag("live_viewing")?,
        bedrooms: p.field_value("bedrooms")?,
        bathrooms: p.field_value("bathrooms")?,
        size: format!("{} {}", p.scalar("size.value")?, p.text("size.unit")?),
        share_url: p.text("share_url")?,
        reference: p.text("reference")?,
        listed_date: p.text("listed_date")?,
        contact_options,
        images_count: p.integer("images_count")?,
        project: p.optional("project").filter(|v| !v.is_null()).cloned(),
        amenities,
        completion_status: p.text("completion_status")?,
        furnished: p.field_value("furnished")?,
        view_360: p.optional_text("view_360")?,
        offering_type: p.text("offering_type")?,
        video_id: p.optional_text("video_id")?,
        is_under_offer_by_competitor: p.flag("is_under_offer_by_competitor")?,
        description: cleanup(&p.text("description")?),
    })
}
