#![no_main]

use classpool::{ConstantPool, Parser, PoolConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new(data);
    let Ok(pool) = ConstantPool::read(&mut parser, &PoolConfig::permissive()) else {
        return;
    };

    assert_eq!(pool.to_bytes().unwrap(), data[..parser.pos()]);

    for (index, _) in pool.iter() {
        let _ = pool.describe(index);
    }
    let _ = pool.validate();
});
