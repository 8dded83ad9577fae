use std::path::Path;

use anyhow::{Context, Result};
use shopify_data::config::{ACCESS_TOKEN_VAR, SHOP_VAR};
use shopify_data::{update_env_file, AccessToken, ShopDomain};

pub fn run(shop: &str, access_token: &str, env_file: &Path) -> Result<()> {
    let shop = ShopDomain::new(shop).context("invalid --shop")?;
    let token = AccessToken::new(access_token).context("invalid --access-token")?;

    update_env_file(env_file, SHOP_VAR, shop.as_ref())?;
    update_env_file(env_file, ACCESS_TOKEN_VAR, token.as_ref())?;

    tracing::info!(shop = %shop, path = %env_file.display(), "saved store credentials");
    println!("Saved credentials for {shop} to {}", env_file.display());
    Ok(())
}
