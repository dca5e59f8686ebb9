// Lock-free communication channel

use crate::messaging::command::Command;
use ringbuf::{HeapRb, traits::Split};

pub type CommandProducer = ringbuf::HeapProd<Command>;
pub type CommandConsumer = ringbuf::HeapCons<Command>;

pub fn create_command_channel(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let rb = HeapRb::<Command>::new(capacity);
    rb.split()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::traits::{Consumer, Producer};

    #[test]
    fn test_commands_cross_the_channel_in_order() {
        let (mut tx, mut rx) = create_command_channel(4);

        tx.try_push(Command::Pulse).unwrap();
        tx.try_push(Command::Pulse).unwrap();

        assert_eq!(rx.try_pop(), Some(Command::Pulse));
        assert_eq!(rx.try_pop(), Some(Command::Pulse));
        assert_eq!(rx.try_pop(), None);
    }

    #[test]
    fn test_full_channel_rejects_push() {
        let (mut tx, _rx) = create_command_channel(1);

        tx.try_push(Command::Pulse).unwrap();
        assert!(tx.try_push(Command::Pulse).is_err());
    }
}
