//! HTML pages rendered with maud.

use axum::http::StatusCode;
use maud::{html, Markup, DOCTYPE};
use promos_db::{ProductSummaryRow, PromotionWithProductRow};

fn layout(title: &str, body: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " · Promotions" }
            }
            body {
                nav {
                    a href="/" { "Products" } " | "
                    a href="/promotions" { "Promotions" } " | "
                    a href="/promotions/upload" { "Upload" } " | "
                    a href="/clear" { "Clear all" }
                }
                h1 { (title) }
                (body)
            }
        }
    }
}

fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

pub fn products_page(products: &[ProductSummaryRow]) -> Markup {
    let body = html! {
        @if products.is_empty() {
            p { "No products yet. " a href="/promotions/upload" { "Upload a promotions file." } }
        } @else {
            table {
                thead {
                    tr { th { "ID" } th { "Name" } th { "Description" } th { "Price" } th { "Promotions" } }
                }
                tbody {
                    @for product in products {
                        tr {
                            td { (product.id) }
                            td { (product.name) }
                            td { (product.description.as_deref().unwrap_or_default()) }
                            td { (money(product.price)) " " (product.currency) }
                            td { (product.promotion_count) }
                        }
                    }
                }
            }
        }
    };
    layout("Products", &body)
}

pub fn promotions_page(promotions: &[PromotionWithProductRow]) -> Markup {
    let body = html! {
        @if promotions.is_empty() {
            p { "No promotions yet." }
        } @else {
            table {
                thead {
                    tr {
                        th { "Product" } th { "Price" } th { "Discount" }
                        th { "Shipping discount" } th { "Valid from" } th { "Valid until" }
                    }
                }
                tbody {
                    @for promotion in promotions {
                        tr {
                            td { (promotion.product_name) }
                            td { (money(promotion.product_price)) " " (promotion.product_currency) }
                            td { (money(promotion.discount)) }
                            td { (money(promotion.shipping_discount)) }
                            td {
                                @if let Some(from) = promotion.valid_from { (from) } @else { "-" }
                            }
                            td {
                                @if let Some(until) = promotion.valid_until { (until) } @else { "-" }
                            }
                        }
                    }
                }
            }
        }
    };
    layout("Promotions", &body)
}

pub fn upload_page(extensions: &[&str]) -> Markup {
    let body = html! {
        form method="post" action="/promotions/upload" enctype="multipart/form-data" {
            input type="file" name="file" required;
            " "
            button type="submit" { "Upload" }
        }
        p { "Supported file types: " (extensions.join(", ")) }
        p {
            "To load a remote file, POST a JSON body such as "
            code { "{\"fileURL\": \"https://example.com/promos.json\", \"fileType\": \"json\"}" }
            " to this URL."
        }
    };
    layout("Upload promotions", &body)
}

pub fn error_page(status: StatusCode, request_id: Option<&str>, detail: Option<&str>) -> Markup {
    let body = html! {
        @if status == StatusCode::NOT_FOUND {
            p { "The page you requested does not exist." }
        } @else {
            p { "Something went wrong while handling your request." }
        }
        @if let Some(detail) = detail {
            pre { (detail) }
        }
        @if let Some(id) = request_id {
            p { small { "Request ID: " (id) } }
        }
    };
    layout("Error", &body)
}
