mod executor;
mod navigation;
mod randomness;
mod reserved_io;
mod tokenizer;
