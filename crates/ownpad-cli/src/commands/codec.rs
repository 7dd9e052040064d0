use anyhow::Result;

use ownpad_core::codec;

pub fn encode(name: &str) -> Result<()> {
    println!("{}", codec::encode(name)?);
    Ok(())
}

pub fn decode(key: &str) -> Result<()> {
    println!("{}", codec::decode(key));
    Ok(())
}
