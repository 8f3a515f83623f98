mod worker_queue;

pub use worker_queue::ChannelJobQueue;
