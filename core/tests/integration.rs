//! Reservation flow against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the catalog, form and
//! confirmation state machines over real HTTP using ureq. Validates that the
//! core's request building, response parsing and page logic work end-to-end
//! with the actual server.

use rental_core::{
    ApiError, ConfirmationPage, FetchStatus, Field, HttpMethod, HttpResponse, RentalClient, RentalForm, Route,
    SubmitBlocked,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: rental_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse::new(status, body)
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn reservation_flow() {
    let client = RentalClient::new(&start_server());

    // Step 1: open /rent/3; bike 3 is unavailable in the seed catalog.
    let Route::Rent { bike_id } = Route::parse("/rent/3") else {
        panic!("expected rent route");
    };
    let mut form = RentalForm::new(bike_id.as_deref());
    form.begin_catalog_load();
    assert!(!form.can_submit());
    let bikes = client.parse_list_bikes(execute(client.build_list_bikes()));
    form.apply_catalog(bikes);
    assert_eq!(form.catalog().status(), FetchStatus::Success);
    assert!(form.catalog().available().all(|b| b.id != 3));

    // Step 2: selection falls back to the first available bike.
    assert_eq!(form.values().bike_id, "1");

    // Step 3: too long a range is caught before any request.
    form.set(Field::Name, "Ada Lovelace");
    form.set(Field::Email, "ada@example.com");
    form.set(Field::StartDate, "2024-01-01");
    form.set(Field::EndDate, "2024-01-06");
    assert!(matches!(form.begin_submit(), Err(SubmitBlocked::Invalid(_))));

    // Step 4: valid range, pick bike 2.
    form.set(Field::EndDate, "2024-01-03");
    form.set(Field::Bike, "2");
    assert_eq!(form.estimated_total_cents(), Some(5000));
    let pending = form.begin_submit().unwrap();
    let req = client.build_create_rental(&pending.request).unwrap();
    let created = client.parse_create_rental(execute(req));
    let nav = form.finish_submit(pending, created).expect("navigation");
    assert!(form.form_error().is_none());

    // Step 5: confirmation fetches the record and merges the preview.
    let Route::Confirmation { id } = &nav.route else {
        panic!("expected confirmation route");
    };
    let mut page = ConfirmationPage::mount(Some(id.as_str()), nav.preview);
    let rental_id = page.rental_id().unwrap();
    let record = client.parse_get_rental(execute(client.build_get_rental(rental_id)));
    page.finish_load(record);
    assert_eq!(page.status(), FetchStatus::Success);

    let details = page.details();
    assert_eq!(details.reservation_id, Some(rental_id));
    // the server record has no bike_name; the preview supplies it
    assert_eq!(details.bike.as_deref(), Some("Trail Blazer"));
    assert_eq!(details.total_price.as_deref(), Some("$50.00"));
    assert_eq!(details.duration_days, Some(2));
    assert_eq!(details.start_date.as_deref(), Some("Jan 1, 2024"));
    assert_eq!(details.contact_name.as_deref(), Some("Ada Lovelace"));
    assert!(details.user_id.is_some());
}

#[test]
fn confirmation_for_unknown_rental() {
    let client = RentalClient::new(&start_server());

    let mut page = ConfirmationPage::mount(Some("404"), None);
    let result = client.parse_get_rental(execute(client.build_get_rental(404)));
    assert!(matches!(result, Err(ApiError::NotFound { .. })));
    page.finish_load(result);
    assert_eq!(page.status(), FetchStatus::Error);
    assert_eq!(page.error(), Some("Rental not found"));
}

#[test]
fn server_rejection_is_shown_on_the_form() {
    let client = RentalClient::new(&start_server());

    let mut form = RentalForm::new(Some("1"));
    form.apply_catalog(client.parse_list_bikes(execute(client.build_list_bikes())));
    form.set(Field::Name, "Ada");
    form.set(Field::Email, "ada@example.com");
    form.set(Field::StartDate, "2024-01-01");
    form.set(Field::EndDate, "2024-01-02");

    // Tamper with the request after validation to reach the server's checks.
    let mut pending = form.begin_submit().unwrap();
    pending.request.bike_id = 3;
    pending.request.selected_bike = 3;
    let req = client.build_create_rental(&pending.request).unwrap();
    let result = client.parse_create_rental(execute(req));
    assert!(form.finish_submit(pending, result).is_none());
    assert_eq!(
        form.form_error(),
        Some("Bike is not available for the selected dates.")
    );
}
