//! Text pages for each route, plus the navigation loop that follows a
//! successful reservation to its confirmation.

use std::fmt::{self, Write as _};
use std::io::{self, Write as _};

use rental_core::dates::day_word;
use rental_core::{
    BikeCard, Catalog, ClientConfig, ConfirmationDetails, ConfirmationPage, FetchStatus, Field, Navigation,
    RentalForm, RentalPreview, Route, SubmitBlocked,
};
use tracing::{info, warn};

use crate::session::Session;

/// Values the user would type into the reservation form.
#[derive(Debug, Clone, Default)]
pub struct RentInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub start_date: String,
    pub end_date: String,
    /// Explicit bike choice, applied after the catalog has loaded.
    pub bike: Option<String>,
}

/// One rendered page and where to go next.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub text: String,
    pub failed: bool,
    pub next: Option<Navigation>,
}

pub struct App {
    pub config: ClientConfig,
    pub session: Session,
    pub rent_input: RentInput,
}

impl App {
    /// Render `start` and follow navigations until a page stops. Returns
    /// whether the final page ended without an error.
    pub async fn run(&self, start: Navigation, out: &mut impl io::Write) -> io::Result<bool> {
        let mut nav = start;
        loop {
            info!(route = %nav.route.path(), "visiting");
            let page = self.visit(nav).await.map_err(io::Error::other)?;
            out.write_all(page.text.as_bytes())?;
            match page.next {
                Some(next) => {
                    writeln!(out)?;
                    nav = next;
                }
                None => return Ok(!page.failed),
            }
        }
    }

    /// Each visit runs under its own child token.
    pub async fn visit(&self, nav: Navigation) -> Result<Page, fmt::Error> {
        let session = self.session.child();
        match nav.route {
            Route::Home => home(&self.config),
            Route::Bikes => bikes(&session).await,
            Route::Rent { bike_id } => rent(&session, bike_id.as_deref(), &self.rent_input).await,
            Route::Confirmation { id } => confirmation(&session, Some(id.as_str()), nav.preview).await,
            Route::NotFound(path) => Ok(Page {
                text: format!("Page not found: {path}\n"),
                failed: true,
                next: None,
            }),
        }
    }
}

pub fn home(config: &ClientConfig) -> Result<Page, fmt::Error> {
    let mut text = String::new();
    writeln!(text, "Personal Transport Rentals")?;
    writeln!(text, "Welcome! Browse bikes with `bikes` or reserve one with `rent`.")?;
    writeln!(text, "API Base URL: {}", config.base_url_label())?;
    Ok(Page {
        text,
        ..Page::default()
    })
}

pub async fn bikes(session: &Session) -> Result<Page, fmt::Error> {
    let mut catalog = Catalog::new();
    catalog.begin_load();
    catalog.finish_load(session.list_bikes().await);
    render_catalog(&catalog)
}

pub fn render_catalog(catalog: &Catalog) -> Result<Page, fmt::Error> {
    let mut text = String::new();
    writeln!(text, "Available Bikes")?;
    writeln!(text, "Choose the perfect ride for your next adventure.")?;
    writeln!(text)?;

    let failed = match catalog.status() {
        FetchStatus::Idle | FetchStatus::Loading => {
            writeln!(text, "Loading bikes...")?;
            false
        }
        FetchStatus::Error => {
            writeln!(text, "We could not load the bike list. Please try again in a moment.")?;
            true
        }
        FetchStatus::Success if catalog.is_empty_success() => {
            writeln!(text, "No bikes are currently available. Please check back soon.")?;
            false
        }
        FetchStatus::Success => {
            for card in catalog.bikes().iter().map(BikeCard::from) {
                render_card(&mut text, &card)?;
            }
            false
        }
    };
    Ok(Page {
        text,
        failed,
        next: None,
    })
}

fn render_card(text: &mut String, card: &BikeCard) -> fmt::Result {
    writeln!(text, "{} ({})", card.name, card.kind)?;
    writeln!(text, "  Price per day: {}", card.price_per_day)?;
    writeln!(text, "  Availability:  {}", card.availability)?;
    if let Some(route) = card.rent_route() {
        writeln!(text, "  Rent:          {}", route.path())?;
    }
    Ok(())
}

pub async fn rent(session: &Session, bike_hint: Option<&str>, input: &RentInput) -> Result<Page, fmt::Error> {
    let mut form = RentalForm::new(bike_hint);
    form.begin_catalog_load();
    form.apply_catalog(session.list_bikes().await);

    form.set(Field::Name, input.name.as_str());
    form.set(Field::Email, input.email.as_str());
    form.set(Field::Phone, input.phone.clone().unwrap_or_default());
    form.set(Field::StartDate, input.start_date.as_str());
    form.set(Field::EndDate, input.end_date.as_str());
    if let Some(bike) = &input.bike {
        form.set(Field::Bike, bike.as_str());
    }

    let next = match form.begin_submit() {
        Ok(pending) => {
            let result = session.create_rental(&pending.request).await;
            form.finish_submit(pending, result)
        }
        Err(SubmitBlocked::CatalogNotReady) => None,
        Err(blocked) => {
            warn!(?blocked, "rental not submitted");
            None
        }
    };

    let mut page = render_form(&form)?;
    page.failed = next.is_none();
    page.next = next;
    Ok(page)
}

pub fn render_form(form: &RentalForm) -> Result<Page, fmt::Error> {
    let mut text = String::new();
    writeln!(text, "Create a Rental")?;
    writeln!(
        text,
        "Reserve your bike by completing the form. Rentals are limited to three consecutive days."
    )?;
    writeln!(text)?;

    let catalog = form.catalog();
    match catalog.status() {
        FetchStatus::Loading => {
            writeln!(text, "Loading available bikes...")?;
        }
        FetchStatus::Error => {
            writeln!(
                text,
                "We could not load bikes right now. Please refresh the page and try again."
            )?;
        }
        _ => {}
    }

    if catalog.status() == FetchStatus::Success {
        if catalog.has_available() {
            writeln!(text, "Bikes:")?;
            let selected = form.selected_bike().map(|b| b.id);
            for bike in catalog.available() {
                let marker = if Some(bike.id) == selected { '*' } else { ' ' };
                let card = BikeCard::from(bike);
                writeln!(text, " {marker} [{}] {} ({}/day)", bike.id, bike.name, card.price_per_day)?;
            }
        } else {
            writeln!(text, "No bikes available")?;
        }
    }

    if let Some(summary) = form.summary() {
        writeln!(text, "{summary}")?;
    }
    if let Some(total) = form.estimated_total_cents() {
        writeln!(text, "Estimated total: {}", rental_core::money::format_usd(total))?;
    }

    for (field, message) in form.field_errors().iter() {
        writeln!(text, "  {}: {message}", field.label())?;
    }
    if let Some(error) = form.form_error() {
        writeln!(text, "Error: {error}")?;
    }
    Ok(Page {
        text,
        ..Page::default()
    })
}

pub async fn confirmation(
    session: &Session,
    id: Option<&str>,
    preview: Option<RentalPreview>,
) -> Result<Page, fmt::Error> {
    let mut page = ConfirmationPage::mount(id, preview);
    if let Some(rental_id) = page.rental_id() {
        let result = session.get_rental(rental_id).await;
        page.finish_load(result);
    }
    render_confirmation(&page)
}

pub fn render_confirmation(page: &ConfirmationPage) -> Result<Page, fmt::Error> {
    let mut text = String::new();
    writeln!(text, "Rental Confirmed")?;
    writeln!(text, "Thank you for reserving your ride with Personal Transport Rentals.")?;
    writeln!(text)?;

    match page.status() {
        FetchStatus::Loading => {
            writeln!(text, "Retrieving your rental details...")?;
        }
        FetchStatus::Error => {
            if let Some(error) = page.error() {
                writeln!(text, "{error}")?;
            }
        }
        _ => {}
    }

    let details = page.details();
    let reference = details.reservation_id.or(page.rental_id());
    if let Some(id) = reference {
        writeln!(text, "Reservation #{id}")?;
    }
    render_details(&mut text, &details)?;

    Ok(Page {
        text,
        failed: page.status() == FetchStatus::Error,
        next: None,
    })
}

fn render_details(text: &mut String, details: &ConfirmationDetails) -> fmt::Result {
    let duration = details.duration_days.map(|days| format!("{days} {}", day_word(days)));
    let user = details.user_id.map(|id| id.to_string());
    let rows = [
        ("Bike", details.bike.as_deref()),
        ("Start date", details.start_date.as_deref()),
        ("End date", details.end_date.as_deref()),
        ("Duration", duration.as_deref()),
        ("Total price", details.total_price.as_deref()),
        ("User ID", user.as_deref()),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            writeln!(text, "  {label:<12} {value}")?;
        }
    }

    if details.has_contact() {
        writeln!(text, "Contact details")?;
        for value in [&details.contact_name, &details.contact_email, &details.contact_phone]
            .into_iter()
            .flatten()
        {
            writeln!(text, "  {value}")?;
        }
    }
    Ok(())
}
