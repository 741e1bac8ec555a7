use intake_products::Product;

/// Prompt asking for a short confirmation that `product` was added.
///
/// SKU, name and price are embedded verbatim; absent fields render empty.
pub fn confirmation_prompt(product: &Product) -> String {
    format!(
        "A new product is being added to a Google Sheet.\n\
         Product details: SKU is \"{sku}\", Name is \"{name}\", and Price is {price}.\n\
         Generate a short, friendly confirmation message for the user, confirming the product has been added.\n",
        sku = product.sku,
        name = product.display_name(),
        price = product.display_price(),
    )
}
